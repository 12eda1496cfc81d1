//! Deterministic content hashing.
//!
//! Every node carries a 64-bit digest of its whole subtree: tag, attributes
//! in sorted-key order, text value, and the digests of its children in
//! child order. Equal digests let the differ treat two subtrees as equal in
//! O(1), which is what makes unchanged-subtree detection cheap.
//!
//! Digests are stable across runs and processes for the same logical
//! content. Unlike `std::hash::Hasher`, nothing here depends on randomized
//! state.

use crate::attr::{Attrs, sorted_pairs};

// =============================================================================
// ContentHasher
// =============================================================================

/// A deterministic hasher over blake3, truncated to `u64`.
pub struct ContentHasher {
    inner: blake3::Hasher,
}

impl ContentHasher {
    /// Create an empty hasher.
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    /// Absorb a string field, length-framed.
    ///
    /// The length prefix keeps adjacent fields from aliasing: the pairs
    /// `("ab", "c")` and `("a", "bc")` produce different digests.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.inner.update(s.as_bytes());
    }

    /// Absorb a `u64` value (little-endian).
    #[inline]
    pub fn write_u64(&mut self, v: u64) {
        self.inner.update(&v.to_le_bytes());
    }

    /// Finish and return the first eight bytes of the blake3 output as a
    /// little-endian `u64`.
    #[inline]
    pub fn finish(self) -> u64 {
        let hash = self.inner.finalize();
        let bytes: [u8; 8] = hash.as_bytes()[..8].try_into().unwrap();
        u64::from_le_bytes(bytes)
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Node digest
// =============================================================================

/// Digest of a node's own content plus its children's digests.
///
/// Attributes are folded in sorted by key, so insertion history never shows
/// up in the digest. Child digests are folded in child order: sibling order
/// is part of a node's identity and two reorderings must not collide.
pub fn node_digest<I>(tag: &str, attrs: &Attrs, value: &str, child_hashes: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    let mut h = ContentHasher::new();
    h.write_str(tag);
    for (k, v) in sorted_pairs(attrs) {
        h.write_str(k);
        h.write_str(v);
    }
    h.write_str(value);
    for child in child_hashes {
        h.write_u64(child);
    }
    h.finish()
}

// =============================================================================
// Tests
// =============================================================================
