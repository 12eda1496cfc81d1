//! Patch operations.
//!
//! The differ's output is an ordered list of [`Op`] values: the contract
//! toward whatever applies or transports the update. Each operation names
//! the identity it applies to plus a kind-specific payload. How the list is
//! encoded on a wire is the transport's business, not this crate's.

use compact_str::CompactString;

use crate::id::NodeId;

// =============================================================================
// OpKind
// =============================================================================

/// The closed set of operation kinds.
///
/// `AppendChild` and `ReplaceChild` exist for appliers that rearrange
/// nodes in place; [`diff`](crate::diff::diff) never produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    CreateElement,
    SetValue,
    SetAttribute,
    RemoveAttribute,
    AppendChild,
    RemoveChild,
    ReplaceChild,
}

// =============================================================================
// Op
// =============================================================================

/// A single patch operation addressed to a node identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// Create a node and attach it under `target`. The consumer learns the
    /// fresh node's identity from `new_id`; the operations describing the
    /// created subtree follow immediately, addressed to that identity.
    CreateElement {
        target: NodeId,
        tag: CompactString,
        new_id: NodeId,
    },

    /// Set the text value of `target`. The carried value is already
    /// entity-escaped.
    SetValue { target: NodeId, value: String },

    /// Insert or overwrite one attribute of `target`.
    SetAttribute {
        target: NodeId,
        key: String,
        value: String,
    },

    /// Drop one attribute of `target`.
    RemoveAttribute { target: NodeId, key: String },

    /// Attach the existing node `child` under `target`. Reserved; never
    /// emitted by the differ.
    AppendChild { target: NodeId, child: NodeId },

    /// Detach the child with identity `child` from `target`.
    RemoveChild { target: NodeId, child: NodeId },

    /// Swap one child of `target` for another. Reserved; never emitted by
    /// the differ.
    ReplaceChild {
        target: NodeId,
        old_child: NodeId,
        new_child: NodeId,
    },
}

impl Op {
    /// The kind tag of this operation.
    pub fn kind(&self) -> OpKind {
        match self {
            Self::CreateElement { .. } => OpKind::CreateElement,
            Self::SetValue { .. } => OpKind::SetValue,
            Self::SetAttribute { .. } => OpKind::SetAttribute,
            Self::RemoveAttribute { .. } => OpKind::RemoveAttribute,
            Self::AppendChild { .. } => OpKind::AppendChild,
            Self::RemoveChild { .. } => OpKind::RemoveChild,
            Self::ReplaceChild { .. } => OpKind::ReplaceChild,
        }
    }

    /// The identity this operation applies to.
    pub fn target(&self) -> NodeId {
        match self {
            Self::CreateElement { target, .. }
            | Self::SetValue { target, .. }
            | Self::SetAttribute { target, .. }
            | Self::RemoveAttribute { target, .. }
            | Self::AppendChild { target, .. }
            | Self::RemoveChild { target, .. }
            | Self::ReplaceChild { target, .. } => *target,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
