//! # Output Digest
//!
//! SHA-256 over rendered table bytes. Identical input and configuration
//! must produce an identical digest; `lctr reconcile --check` compares
//! digests to detect a stale output table.

use sha2::{Digest, Sha256};

/// A SHA-256 digest of a rendered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableDigest([u8; 32]);

impl TableDigest {
    /// Hash raw bytes.
    pub fn of(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hasher.finalize().into())
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for TableDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Hex SHA-256 of raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    TableDigest::of(bytes).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_known_vector() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn display_is_tagged() {
        let d = TableDigest::of(b"abc");
        assert!(d.to_string().starts_with("sha256:ba7816bf"));
        assert_eq!(d.as_bytes().len(), 32);
    }
}
