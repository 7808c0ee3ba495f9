//! One-way digest for PIN storage.
//!
//! The strict-mode PIN is never persisted; only its SHA-256 hex digest
//! is. Comparison is constant-time to avoid a timing oracle on the
//! digest bytes.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Lowercase hex SHA-256 digest of a string.
pub fn sha256_hex(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// Constant-time comparison of two hex digests.
///
/// Length mismatch returns false immediately; digests of equal length
/// are compared without early exit.
pub fn digest_matches(candidate: &str, stored: &str) -> bool {
    if candidate.len() != stored.len() {
        return false;
    }
    candidate.as_bytes().ct_eq(stored.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_answer() {
        // SHA-256("1234"), independently computed
        assert_eq!(
            sha256_hex("1234"),
            "03ac674216f3e15c761ee1a5e255f067953623c8b388b4459e13f978d7c846f4"
        );
    }

    #[test]
    fn test_sha256_hex_is_lowercase_64_chars() {
        let digest = sha256_hex("any input");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_digest_matches() {
        let stored = sha256_hex("1234");
        assert!(digest_matches(&sha256_hex("1234"), &stored));
        assert!(!digest_matches(&sha256_hex("9999"), &stored));
        assert!(!digest_matches("", &stored));
    }
}
