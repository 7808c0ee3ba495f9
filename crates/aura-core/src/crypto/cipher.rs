//! Backup payload cipher.
//!
//! Encrypts a JSON value into the backup wire format and back. The
//! on-disk layout is a flat byte string:
//!
//! ```text
//! salt(16) || nonce(12) || AES-256-GCM ciphertext+tag
//! ```
//!
//! Both offsets and the key derivation parameters are fixed: any
//! implementation that reproduces this layout byte-for-byte can read
//! backups produced by any other.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::crypto::key::derive_key;
use crate::error::{AuraError, Result};

/// Salt length in bytes, stored at offset 0.
const SALT_LEN: usize = 16;

/// Nonce length in bytes, stored at offset 16.
const NONCE_LEN: usize = 12;

/// GCM authentication tag length appended to the ciphertext.
const TAG_LEN: usize = 16;

/// Encrypt a JSON value with a passphrase.
///
/// Generates a fresh random salt and nonce per call, so encrypting the
/// same value twice yields different bytes. The derived key lives only
/// for the duration of the call.
///
/// # Errors
///
/// Returns `AuraError::Validation` for an empty passphrase and
/// `AuraError::Storage` if the cipher itself fails (never expected for
/// valid inputs).
pub fn encrypt_json(passphrase: &str, value: &serde_json::Value) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(passphrase, &salt)?;
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|_| AuraError::Storage("Cipher initialization failed".to_string()))?;

    let plaintext = serde_json::to_vec(value)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_ref())
        .map_err(|_| AuraError::Storage("Encryption failed".to_string()))?;

    let mut out = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt a backup produced by [`encrypt_json`].
///
/// Parses the fixed offsets, re-derives the key from the embedded salt,
/// and verifies the GCM tag before any plaintext is returned.
///
/// # Errors
///
/// Returns `AuraError::Decryption` if the input is too short to contain
/// a header and tag, if the tag does not verify (wrong passphrase or
/// tampered bytes), or if the plaintext is not valid JSON. Never returns
/// partially-decrypted data.
pub fn decrypt_json(passphrase: &str, data: &[u8]) -> Result<serde_json::Value> {
    if data.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
        return Err(AuraError::Decryption);
    }

    let salt = &data[..SALT_LEN];
    let nonce_bytes = &data[SALT_LEN..SALT_LEN + NONCE_LEN];
    let ciphertext = &data[SALT_LEN + NONCE_LEN..];

    let key = derive_key(passphrase, salt)?;
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|_| AuraError::Storage("Cipher initialization failed".to_string()))?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| AuraError::Decryption)?;

    serde_json::from_slice(&plaintext).map_err(|_| AuraError::Decryption)
}
