//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! This module derives the backup encryption key from a passphrase. The
//! iteration count is deliberately high so that brute-forcing a weak
//! passphrase against a stolen backup file is expensive.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::ZeroizeOnDrop;

use crate::error::{AuraError, Result};

/// PBKDF2 iteration count.
///
/// This value is part of the backup wire format: a backup encrypted at
/// one count cannot be decrypted at another, so it is fixed for the
/// lifetime of schema version 2.
const PBKDF2_ITERATIONS: u32 = 200_000;

/// Length of derived key in bytes (32 bytes = 256 bits for AES-256-GCM).
const KEY_LENGTH: usize = 32;

/// Minimum salt length accepted by [`derive_key`].
const MIN_SALT_LENGTH: usize = 16;

/// A cryptographic key derived from a passphrase.
///
/// Key material is zeroized from memory when dropped, reducing the
/// window of exposure.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Get a reference to the raw key bytes.
    ///
    /// # Security
    ///
    /// Avoid storing or logging this value. Use only for immediate
    /// encryption operations.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive the backup encryption key from a passphrase and salt.
///
/// # Arguments
///
/// * `passphrase` - The passphrase to derive from
/// * `salt` - Random salt (fresh per encryption, stored in the backup header)
///
/// # Security
///
/// - Same passphrase + salt always produces the same key (deterministic)
/// - Different salt produces a different key
/// - 200,000 PBKDF2-HMAC-SHA256 rounds per derivation
///
/// # Errors
///
/// Returns `AuraError::Validation` for an empty passphrase or a salt
/// shorter than 16 bytes.
pub fn derive_key(passphrase: &str, salt: &[u8]) -> Result<DerivedKey> {
    if passphrase.is_empty() {
        return Err(AuraError::Validation(
            "Passphrase cannot be empty".to_string(),
        ));
    }

    if salt.len() < MIN_SALT_LENGTH {
        return Err(AuraError::Validation(format!(
            "Salt must be at least {} bytes",
            MIN_SALT_LENGTH
        )));
    }

    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(
        passphrase.as_bytes(),
        salt,
        PBKDF2_ITERATIONS,
        &mut key_bytes,
    );

    Ok(DerivedKey::from_bytes(key_bytes))
}
