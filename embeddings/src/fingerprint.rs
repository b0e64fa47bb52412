//! Content fingerprinting.
//!
//! A fingerprint is a SHA-256 digest of a text's UTF-8 bytes, rendered as
//! lowercase hex. It serves as both the cache key and the stored document
//! id, so identical content always resolves to the same identity. No
//! normalization is applied before hashing: texts differing only in
//! whitespace get distinct fingerprints.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A content-derived identifier for a piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// View the fingerprint as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the fingerprint of a text.
///
/// Pure and total: any string input, including the empty string, hashes
/// deterministically.
pub fn fingerprint(text: &str) -> Fingerprint {
    Fingerprint(hex::encode(Sha256::digest(text.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fingerprint_deterministic() {
        assert_eq!(fingerprint("hello"), fingerprint("hello"));
    }

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let fp = fingerprint("hello");
        assert_eq!(fp.as_str().len(), 64);
        assert!(fp.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        // Known SHA-256 vector.
        assert_eq!(
            fingerprint("").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_fingerprint_distinguishes_content() {
        assert_ne!(fingerprint("hello"), fingerprint("world"));
    }

    #[test]
    fn test_fingerprint_sensitive_to_whitespace() {
        assert_ne!(fingerprint("hello"), fingerprint("hello "));
    }
}
