//! Error types for High Aura core operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages.

use thiserror::Error;

/// Result type alias for High Aura operations.
pub type Result<T> = std::result::Result<T, AuraError>;

/// Core error type for High Aura operations.
#[derive(Debug, Error)]
pub enum AuraError {
    /// Wrong passphrase, or a corrupted/tampered/truncated backup.
    /// Decryption fails closed; no partial data is ever returned.
    #[error("Decryption failed: wrong passphrase or corrupted backup")]
    Decryption,

    /// Decrypted backup payload is structurally invalid
    #[error("Malformed backup: {0}")]
    MalformedBackup(String),

    /// Data validation error (PIN format, passphrase length, field values)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// I/O error
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}
