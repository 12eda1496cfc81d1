//! Process-wide node identity.
//!
//! Every node in every [`Tree`](crate::tree::Tree) draws its identity from a
//! single shared counter, so an id is unique across all trees alive in the
//! process and patch operations can address nodes unambiguously. Identities
//! are never reissued: destroying a node retires its id for good, and a
//! reused allocation gets a fresh one.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// NodeId
// =============================================================================

/// Shared identity counter. Creations in unrelated trees must not serialize
/// on a lock, and nothing orders against the counter, so a relaxed atomic
/// add is all that is needed. The first id handed out is 1.
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of a tree node.
///
/// Assigned once at creation and stable for the node's whole life. Patch
/// operations use `NodeId` as their addressing key: it stands in for "this
/// node" on the consuming side.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[must_use]
pub struct NodeId(u64);

impl NodeId {
    /// Draw the next fresh identity.
    #[inline]
    pub(crate) fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Reconstruct an id from its raw value.
    ///
    /// Intended for consumers decoding a patch stream. An id invented out
    /// of thin air is harmless: it simply resolves to no node.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw `u64` representation.
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
