//! Tree reconciliation.
//!
//! [`diff`] walks two snapshots and emits the ordered operation list that
//! turns the first into the second. Subtree digests drive the walk: equal
//! digests end a branch in O(1), so only changed regions are descended
//! into.
//!
//! # Child matching and its limits
//!
//! Children are aligned by content, not by key and not by position. An old
//! child and a new child pair up when tag, attribute set and text value all
//! match; the first match in child order wins. Matched pairs whose subtree
//! digests differ are descended into. Everything unmatched on the old side
//! is removed; everything unmatched on the new side is created.
//!
//! Consequences worth knowing:
//!
//! - Reordering structurally distinct siblings is invisible. Both sides
//!   still find their match, so a pure permutation emits nothing.
//! - A child whose own tag, attributes or value changed pairs with nothing
//!   and comes out as a remove plus a full re-create.
//! - Siblings with identical tag, attributes and value are
//!   indistinguishable to the matcher.
//!
//! There is no LCS and no key-based alignment.
//!
//! # Emission order
//!
//! Within one node's comparison the order is fixed: child removals, child
//! creations (each followed depth-first by the created subtree's own
//! operations), descents into matched pairs, attribute sets, attribute
//! removals, value set. An applier that executes the list in order arrives
//! at the new snapshot.

use tracing::trace;

use crate::attr::{AttrsExt, attrs_eq};
use crate::id::NodeId;
use crate::ops::Op;
use crate::tree::ElementRef;

// =============================================================================
// Difference
// =============================================================================

/// Counters describing one diff run.
#[derive(Debug, Default, Clone, Copy)]
#[must_use]
pub struct DiffStats {
    /// Node pairs compared, including the roots.
    pub nodes_compared: usize,
    /// Subtrees skipped because their digests matched.
    pub subtrees_skipped: usize,
    /// Children scheduled for removal.
    pub children_removed: usize,
    /// Nodes created, counting every node of freshly built subtrees.
    pub children_created: usize,
    /// Matched pairs descended into.
    pub pairs_recursed: usize,
}

/// Ordered operation list produced by [`diff`], with run statistics.
#[derive(Debug)]
#[must_use]
pub struct Difference {
    /// The operations, in application order.
    pub ops: Vec<Op>,
    /// Counters from the run.
    pub stats: DiffStats,
}

impl Difference {
    /// Check whether any operations were emitted.
    pub fn has_changes(&self) -> bool {
        !self.ops.is_empty()
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Compute the operations that turn `old` into `new`.
///
/// Both roots absent yields an empty list, as does an absent `new` (there
/// is nothing to build toward). An absent `old` emits the new root's
/// children as full subtree creations, its attributes as sets and, for a
/// text root, its value, all addressed to the new root's identity.
///
/// Existing nodes are addressed by the identities they carry in `old`;
/// created nodes introduce their own fresh identities via
/// [`Op::CreateElement`]. The two roots may live in the same arena or in
/// different ones.
///
/// Never fails on live inputs; the result is exact, with no size or depth
/// cutoff.
pub fn diff(old: Option<ElementRef<'_>>, new: Option<ElementRef<'_>>) -> Difference {
    let mut ctx = DiffContext::default();
    if let Some(new) = new {
        ctx.diff_nodes(old, new, new.id());
    }
    trace!(
        ops = ctx.ops.len(),
        compared = ctx.stats.nodes_compared,
        skipped = ctx.stats.subtrees_skipped,
        "diff complete"
    );
    Difference {
        ops: ctx.ops,
        stats: ctx.stats,
    }
}

// =============================================================================
// Internal context
// =============================================================================

#[derive(Default)]
struct DiffContext {
    ops: Vec<Op>,
    stats: DiffStats,
}

impl DiffContext {
    fn diff_nodes<'o, 'n>(
        &mut self,
        old: Option<ElementRef<'o>>,
        new: ElementRef<'n>,
        mut target: NodeId,
    ) {
        self.stats.nodes_compared += 1;

        // Modifications apply to the node that already exists on the
        // consuming side, so its identity wins as the target.
        if let Some(old) = &old {
            target = old.id();
        }

        let mut removed: Vec<NodeId> = Vec::new();
        let mut added: Vec<ElementRef<'n>> = Vec::new();
        let mut modified: Vec<(ElementRef<'o>, ElementRef<'n>)> = Vec::new();

        if let Some(old) = &old {
            if old.content_hash() == new.content_hash() {
                self.stats.subtrees_skipped += 1;
                return;
            }
            for child in old.children() {
                match find_match(&new, &child) {
                    None => removed.push(child.id()),
                    Some(counterpart) => {
                        if child.content_hash() != counterpart.content_hash() {
                            modified.push((child, counterpart));
                        } else {
                            self.stats.subtrees_skipped += 1;
                        }
                    }
                }
            }
            for child in new.children() {
                if find_match(old, &child).is_none() {
                    added.push(child);
                }
            }
        } else {
            added.extend(new.children());
        }

        self.stats.children_removed += removed.len();
        for child in removed {
            self.ops.push(Op::RemoveChild { target, child });
        }

        for child in added {
            self.stats.children_created += 1;
            self.ops.push(Op::CreateElement {
                target,
                tag: child.tag().into(),
                new_id: child.id(),
            });
            // Depth-first: the created subtree's own operations follow its
            // create immediately, addressed to the fresh identity.
            self.diff_nodes(None, child, child.id());
        }

        for (old_child, new_child) in modified {
            self.stats.pairs_recursed += 1;
            self.diff_nodes(Some(old_child), new_child, target);
        }

        self.diff_attrs(&old, &new, target);
        self.diff_value(&old, &new, target);
    }

    /// Attribute reconciliation. All sets are emitted before all removes;
    /// set values are always taken from the new side.
    fn diff_attrs(&mut self, old: &Option<ElementRef<'_>>, new: &ElementRef<'_>, target: NodeId) {
        let mut sets: Vec<(&str, &str)> = Vec::new();
        let mut removes: Vec<&str> = Vec::new();

        match old {
            Some(old) if attrs_eq(old.attrs(), new.attrs()) => {}
            Some(old) => {
                for (key, _) in old.attrs() {
                    if !new.attrs().has_attr(key) {
                        removes.push(key.as_str());
                    }
                }
                for (key, value) in new.attrs() {
                    if old.attr(key) != Some(value.as_str()) {
                        sets.push((key.as_str(), value.as_str()));
                    }
                }
            }
            None => {
                sets.extend(new.attrs().iter().map(|(k, v)| (k.as_str(), v.as_str())));
            }
        }

        for (key, value) in sets {
            self.ops.push(Op::SetAttribute {
                target,
                key: key.to_owned(),
                value: value.to_owned(),
            });
        }
        for key in removes {
            self.ops.push(Op::RemoveAttribute {
                target,
                key: key.to_owned(),
            });
        }
    }

    /// Value reconciliation. A brand-new text node gets its content here:
    /// the generic create carries no text payload.
    fn diff_value(&mut self, old: &Option<ElementRef<'_>>, new: &ElementRef<'_>, target: NodeId) {
        match old {
            Some(old) => {
                if old.value() != new.value() {
                    self.ops.push(Op::SetValue {
                        target,
                        value: new.value().to_owned(),
                    });
                }
            }
            None => {
                if new.is_text() && !new.value().is_empty() {
                    self.ops.push(Op::SetValue {
                        target,
                        value: new.value().to_owned(),
                    });
                }
            }
        }
    }
}

/// First child of `parent` matching `node` by own content, in child order.
fn find_match<'a>(parent: &ElementRef<'a>, node: &ElementRef<'_>) -> Option<ElementRef<'a>> {
    parent.children().find(|c| c.matches(node))
}

// =============================================================================
// Tests
// =============================================================================
