//! Cryptographic operations for High Aura.
//!
//! This module provides the backup cipher and the PIN digest:
//! - **PBKDF2-HMAC-SHA256** key derivation (deliberately slow, 200k rounds)
//! - **AES-256-GCM** authenticated encryption for backup payloads
//! - **SHA-256** one-way digest for strict-mode PIN storage
//!
//! ## Security Model
//!
//! - Backup files are opaque without the passphrase; a fresh salt and
//!   nonce are generated per encryption, so identical payloads never
//!   produce identical ciphertext
//! - Decryption fails closed on tag mismatch; no partial plaintext escapes
//! - PIN hashes are compared in constant time
//! - Derived key material is zeroized from memory on drop
//!
//! ## Threat Model
//!
//! We defend against theft of an exported backup file and offline
//! brute-force on the passphrase. We do NOT defend against a compromised
//! OS or access to the unlocked local database.

pub mod cipher;
pub mod digest;
pub mod key;
pub mod passphrase;

pub use cipher::{decrypt_json, encrypt_json};
pub use digest::{digest_matches, sha256_hex};
pub use key::{derive_key, DerivedKey};
pub use passphrase::validate_passphrase;
