//! Canonical hashing types and domain separation constants.
//!
//! Algorithm: SHA-256 for every artifact. Each domain prefix is
//! null-terminated so that no prefix is a prefix of another.

use sha2::{Digest, Sha256};

/// A content-addressed hash with algorithm identifier, rendered as
/// `"algorithm:hex_digest"` (e.g., `"sha256:abcdef..."`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Domain prefix for taxonomy configuration digests.
pub const DOMAIN_TAXONOMY: &[u8] = b"AIRWAY::TAXONOMY::V1\0";

/// Domain prefix for extracted (input) tree documents.
pub const DOMAIN_INPUT_TREE: &[u8] = b"AIRWAY::INPUT_TREE::V1\0";

/// Domain prefix for classified (output) tree documents.
pub const DOMAIN_CLASSIFIED_TREE: &[u8] = b"AIRWAY::CLASSIFIED_TREE::V1\0";

/// Compute the canonical hash of a byte slice with domain separation.
///
/// Result format: `"sha256:<hex_digest>"` where the digest covers
/// `domain || data`.
#[must_use]
pub fn canonical_hash(domain: &[u8], data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    let digest = hex::encode(hasher.finalize());
    ContentHash(format!("sha256:{digest}"))
}
