//! Error types.
//!
//! Mutations on a tree never fail: structurally invalid requests are
//! defined as silent no-ops so the mutation API stays total. Only read
//! paths and the patch applier report errors.

use thiserror::Error;

use crate::id::NodeId;
use crate::ops::OpKind;

/// Errors surfaced by tree lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    /// Attribute lookup on a key the element does not carry. Callers must
    /// handle absence explicitly; it is not a fatal condition.
    #[error("attribute not found: {key}")]
    AttributeNotFound {
        /// The key that was looked up.
        key: String,
    },

    /// The id does not resolve to a live node in this tree.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),
}

/// Errors from the reference patch applier.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApplyError {
    /// An operation addressed an identity known neither to the tree nor to
    /// any preceding create in the same list.
    #[error("patch target not found: {0}")]
    UnknownTarget(NodeId),

    /// A reserved operation kind the differ never emits.
    #[error("unsupported operation kind: {0:?}")]
    Unsupported(OpKind),
}
