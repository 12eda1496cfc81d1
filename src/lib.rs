//! domdelta - virtual markup tree with content-hash diffing.
//!
//! Maintains an in-memory tree of markup elements and computes the ordered
//! list of mutation operations that turns one snapshot into another. Built
//! for server-side and headless renderers that push incremental updates to
//! a remote consumer instead of re-serializing whole documents.
//!
//! ## Core pieces
//!
//! - [`Tree`]: arena-owned element tree. Every mutation keeps each node's
//!   64-bit subtree digest fresh up to the root, so two subtrees can be
//!   compared for equality in O(1).
//! - [`diff`]: recursive reconciliation that compares digests top-down and
//!   only descends where content changed, emitting an ordered [`Op`] list.
//! - [`apply`]: the reference applier, the consumer-side reading of that
//!   list.
//! - [`to_markup`]: textual serialization of a subtree.
//!
//! ## Usage
//!
//! ```
//! use domdelta::{Tree, diff, apply};
//!
//! let mut tree = Tree::new();
//! let list = tree.create_element("ul");
//! let item = tree.create_element("li");
//! tree.append_child(list, item);
//! tree.set_text(item, "first");
//!
//! // Snapshot, then keep mutating the live tree.
//! let snapshot = tree.clone_node(list, true).unwrap();
//! tree.set_attribute(item, "class", "done");
//!
//! // The delta turns the snapshot into the current state.
//! let delta = diff(tree.get(snapshot), tree.get(list));
//! assert!(delta.has_changes());
//!
//! apply(&mut tree, &delta.ops).unwrap();
//! assert!(tree.get(snapshot).unwrap().subtree_eq(&tree.get(list).unwrap()));
//! ```
//!
//! Trees are single-writer: serialize mutations per tree. Identity
//! allocation is the one shared piece of state and is lock-free, so
//! independent trees on independent threads do not contend.

// =============================================================================
// Modules
// =============================================================================

/// Reference patch applier.
pub mod apply;

/// Attribute storage.
pub mod attr;

/// Tree reconciliation.
pub mod diff;

/// Error types.
pub mod error;

/// Deterministic content hashing.
pub mod hash;

/// Process-wide node identity.
pub mod id;

/// Patch operations.
pub mod ops;

/// Markup serialization and escaping.
pub mod render;

/// The element tree.
pub mod tree;

// =============================================================================
// Re-exports
// =============================================================================

pub use apply::apply;
pub use attr::{Attrs, AttrsExt, attrs_eq};
pub use diff::{DiffStats, Difference, diff};
pub use error::{ApplyError, TreeError};
pub use hash::{ContentHasher, node_digest};
pub use id::NodeId;
pub use ops::{Op, OpKind};
pub use render::{escape_entities, to_markup};
pub use tree::{ElementRef, TEXT_TAG, Tree};

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_diff_apply_cycle() {
        let mut tree = Tree::new();
        let root = tree.create_element("body");
        let heading = tree.create_element("h1");
        tree.append_child(root, heading);
        tree.set_text(heading, "news");

        // First frame: everything is new.
        let frame0 = diff(None, tree.get(root));
        assert!(frame0.has_changes());

        // Snapshot, mutate, diff against the snapshot.
        let snapshot = tree.clone_node(root, true).unwrap();
        let para = tree.create_element("p");
        tree.append_child(root, para);
        tree.set_text(para, "body text");
        tree.set_attribute(root, "class", "updated");

        let frame1 = diff(tree.get(snapshot), tree.get(root));
        assert!(frame1.has_changes());

        apply(&mut tree, &frame1.ops).unwrap();
        assert!(
            tree.get(snapshot)
                .unwrap()
                .subtree_eq(&tree.get(root).unwrap())
        );

        // Once caught up, the delta is empty.
        let frame2 = diff(tree.get(snapshot), tree.get(root));
        assert!(!frame2.has_changes());
    }
}
