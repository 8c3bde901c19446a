//! Content fingerprinting
//!
//! A certification body is identified by the SHA-256 digest of its
//! normalized text, rendered as 64 lowercase hex characters.

use sha2::{Digest, Sha256};

use super::normalize::normalize_for_fingerprint;

/// Lowercase-hex SHA-256 of a string's UTF-8 bytes
pub fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Fingerprint a certification body: normalize, then hash
pub fn fingerprint(certification_body: &str) -> String {
    sha256_hex(&normalize_for_fingerprint(certification_body))
}
