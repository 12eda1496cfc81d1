//! Reference patch applier.
//!
//! Interprets an operation list against a live tree the way a remote
//! consumer would. Pre-existing targets resolve directly by identity; each
//! [`Op::CreateElement`] registers an alias so the identities the differ
//! assigned to fresh nodes resolve to the locally allocated ones.
//!
//! Applying `diff(old, new)` to the tree holding `old` reproduces `new`'s
//! structure. That round trip is the correctness law the test suite leans
//! on; consumers implementing their own applier should mirror the
//! semantics here.

use rustc_hash::FxHashMap;

use crate::error::ApplyError;
use crate::id::NodeId;
use crate::ops::Op;
use crate::tree::{TEXT_TAG, Tree};

/// Apply `ops` in order to `tree`.
///
/// Fails on the first operation whose target cannot be resolved and on the
/// reserved kinds the differ never emits; everything applied up to that
/// point stays applied.
pub fn apply(tree: &mut Tree, ops: &[Op]) -> Result<(), ApplyError> {
    let mut aliases: FxHashMap<NodeId, NodeId> = FxHashMap::default();

    for op in ops {
        match op {
            Op::CreateElement {
                target,
                tag,
                new_id,
            } => {
                let parent = resolve(tree, &aliases, *target)?;
                let node = if tag.as_str() == TEXT_TAG {
                    tree.create_text_node("")
                } else {
                    tree.create_element(tag.clone())
                };
                tree.append_child(parent, node);
                aliases.insert(*new_id, node);
            }
            Op::SetValue { target, value } => {
                let id = resolve(tree, &aliases, *target)?;
                // The payload was escaped by the producing tree; store it
                // verbatim.
                tree.set_value_raw(id, value);
            }
            Op::SetAttribute { target, key, value } => {
                let id = resolve(tree, &aliases, *target)?;
                tree.set_attribute(id, key.clone(), value.clone());
            }
            Op::RemoveAttribute { target, key } => {
                let id = resolve(tree, &aliases, *target)?;
                tree.remove_attribute(id, key);
            }
            Op::RemoveChild { target, child } => {
                let parent = resolve(tree, &aliases, *target)?;
                let child = resolve(tree, &aliases, *child)?;
                tree.remove_child(parent, child);
                tree.destroy(child);
            }
            Op::AppendChild { .. } | Op::ReplaceChild { .. } => {
                return Err(ApplyError::Unsupported(op.kind()));
            }
        }
    }
    Ok(())
}

/// Map a wire identity to a live local node.
fn resolve(
    tree: &Tree,
    aliases: &FxHashMap<NodeId, NodeId>,
    wire: NodeId,
) -> Result<NodeId, ApplyError> {
    let id = aliases.get(&wire).copied().unwrap_or(wire);
    if tree.contains(id) {
        Ok(id)
    } else {
        Err(ApplyError::UnknownTarget(wire))
    }
}

// =============================================================================
// Tests
// =============================================================================
