//! The element tree.
//!
//! A [`Tree`] owns every node it contains, keyed by [`NodeId`] in an arena
//! map. Children are owned top-down as id sequences; the parent link is a
//! plain back-handle used for digest repropagation and detach-on-reattach,
//! so ownership cycles cannot form.
//!
//! Every mutation recomputes the content digest of the touched node and of
//! each ancestor up to the root before returning. Digests are never stale:
//! the differ depends on that.
//!
//! The mutation API is total. Requests that would violate structure (adding
//! children or attributes to a text node, closing a cycle, addressing a
//! dead id) are silent no-ops, logged at `warn` where they look like caller
//! bugs.
//!
//! A tree expects a single writer. Mutations are not synchronized against
//! each other; only identity allocation is safe across threads, so
//! independent trees on independent threads are fine.

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::warn;

use crate::attr::{Attrs, AttrsExt, attrs_eq};
use crate::error::TreeError;
use crate::hash::node_digest;
use crate::id::NodeId;
use crate::render;

/// Reserved tag marking text nodes.
///
/// A text node carries only a value. It never has attributes or children;
/// mutations that would add either are no-ops.
pub const TEXT_TAG: &str = "__textnode__";

// =============================================================================
// NodeData
// =============================================================================

#[derive(Debug, Clone)]
struct NodeData {
    tag: CompactString,
    attrs: Attrs,
    children: SmallVec<[NodeId; 8]>,
    value: String,
    parent: Option<NodeId>,
    hash: u64,
}

// =============================================================================
// Tree
// =============================================================================

/// Arena of element nodes.
///
/// May hold any number of roots at once: detached nodes simply have no
/// parent. Snapshots for diffing are taken with [`clone_node`], which
/// allocates the copy in the same arena.
///
/// [`clone_node`]: Tree::clone_node
#[derive(Debug, Default)]
pub struct Tree {
    nodes: FxHashMap<NodeId, NodeData>,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check whether `id` resolves to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Creation
    // ─────────────────────────────────────────────────────────────────────────

    /// Allocate a detached element with a fresh identity and an initial
    /// digest.
    pub fn create_element(&mut self, tag: impl Into<CompactString>) -> NodeId {
        let id = NodeId::next();
        self.nodes.insert(
            id,
            NodeData {
                tag: tag.into(),
                attrs: Attrs::new(),
                children: SmallVec::new(),
                value: String::new(),
                parent: None,
                hash: 0,
            },
        );
        self.refresh_hashes(id);
        id
    }

    /// Allocate a detached text node.
    ///
    /// The value is entity-escaped here, at storage. It is never escaped
    /// again: the serializer writes text values through verbatim.
    pub fn create_text_node(&mut self, text: &str) -> NodeId {
        let id = self.create_element(TEXT_TAG);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.value = render::escape_entities(text).into_owned();
        }
        self.refresh_hashes(id);
        id
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Borrowed cursor over the node, or `None` for a dead id.
    pub fn get(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.nodes.get(&id).map(|data| ElementRef {
            tree: self,
            id,
            data,
        })
    }

    /// Tag name of the node.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.tag.as_str())
    }

    /// Text value of the node (empty for non-text nodes).
    pub fn value(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.value.as_str())
    }

    /// Parent of the node, if attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Child ids in order. Empty for dead ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    /// Attribute pairs in insertion order. Empty for dead ids.
    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        self.nodes.get(&id).map_or(&[], |n| n.attrs.as_slice())
    }

    /// Current subtree digest of the node.
    pub fn content_hash(&self, id: NodeId) -> Option<u64> {
        self.nodes.get(&id).map(|n| n.hash)
    }

    /// Check whether the node is a text node.
    pub fn is_text(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.tag == TEXT_TAG)
    }

    /// Check whether the node has any children.
    pub fn has_child_nodes(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(|n| !n.children.is_empty())
    }

    /// Look up one attribute value.
    ///
    /// Absence is an ordinary outcome, reported as
    /// [`TreeError::AttributeNotFound`] so callers must handle it.
    pub fn attribute(&self, id: NodeId, key: &str) -> Result<&str, TreeError> {
        let node = self.nodes.get(&id).ok_or(TreeError::NodeNotFound(id))?;
        node.attrs
            .get_attr(key)
            .ok_or_else(|| TreeError::AttributeNotFound { key: key.to_owned() })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attribute mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or overwrite one attribute.
    ///
    /// Values are stored raw; the serializer escapes them on output.
    pub fn set_attribute(&mut self, id: NodeId, key: impl Into<String>, value: impl Into<String>) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if node.tag == TEXT_TAG {
            warn!(node = %id, "ignoring attribute on a text node");
            return;
        }
        node.attrs.set_attr(key, value);
        self.refresh_hashes(id);
    }

    /// Remove one attribute. No-op if the key is absent.
    pub fn remove_attribute(&mut self, id: NodeId, key: &str) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        if node.attrs.remove_attr(key).is_none() {
            return;
        }
        self.refresh_hashes(id);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Structure mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Append `child` as the last child of `parent`.
    ///
    /// Move semantics: a node belongs to at most one position, so a child
    /// that is already attached somewhere is detached there first (with the
    /// old parent's digests repropagated). No-op if `parent` is a text node
    /// or if the append would make a node its own ancestor.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            return;
        }
        if self.is_text(parent) {
            warn!(parent = %parent, child = %child, "ignoring append_child on a text node");
            return;
        }
        if parent == child || self.is_ancestor(child, parent) {
            warn!(parent = %parent, child = %child, "ignoring append_child that would close a cycle");
            return;
        }
        self.detach(child);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = Some(parent);
        }
        self.refresh_hashes(parent);
    }

    /// Remove the first child of `parent` whose identity is `child`.
    ///
    /// The removed node stays alive in the arena as a detached root; free
    /// it with [`destroy`](Tree::destroy) if it is no longer wanted. No-op
    /// if `child` is not among `parent`'s children.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(p) = self.nodes.get_mut(&parent) else {
            return;
        };
        let Some(pos) = p.children.iter().position(|c| *c == child) else {
            return;
        };
        p.children.remove(pos);
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = None;
        }
        self.refresh_hashes(parent);
    }

    /// Swap the child `old_child` of `parent` for `new_child`, in place.
    ///
    /// `old_child` stays alive, detached. No-op if `old_child` is not a
    /// child of `parent`, if `new_child` is dead, or if the swap would
    /// close a cycle.
    pub fn replace_child(&mut self, parent: NodeId, old_child: NodeId, new_child: NodeId) {
        if old_child == new_child || !self.contains(new_child) || self.is_text(parent) {
            return;
        }
        if parent == new_child || self.is_ancestor(new_child, parent) {
            warn!(parent = %parent, child = %new_child, "ignoring replace_child that would close a cycle");
            return;
        }
        let Some(p) = self.nodes.get(&parent) else {
            return;
        };
        if !p.children.contains(&old_child) {
            return;
        }
        self.detach(new_child);
        // Re-find the slot: the detach above may have shifted positions if
        // new_child was already under this parent.
        if let Some(pos) = self
            .nodes
            .get(&parent)
            .and_then(|p| p.children.iter().position(|c| *c == old_child))
        {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children[pos] = new_child;
            }
            if let Some(o) = self.nodes.get_mut(&old_child) {
                o.parent = None;
            }
            if let Some(n) = self.nodes.get_mut(&new_child) {
                n.parent = Some(parent);
            }
            self.refresh_hashes(parent);
        }
    }

    /// Detach `id` from its parent, leaving it in the arena as a root.
    /// No-op for roots and dead ids.
    pub fn detach(&mut self, id: NodeId) {
        let Some(pid) = self.nodes.get(&id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(&pid) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.nodes.get_mut(&id) {
            n.parent = None;
        }
        self.refresh_hashes(pid);
    }

    /// Replace all children of `id` with a single fresh text node carrying
    /// the entity-escaped `text`.
    ///
    /// The former children are detached, not destroyed: they stay in the
    /// arena as roots, exactly as if removed one by one. No-op on text
    /// nodes.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if node.tag == TEXT_TAG {
            warn!(node = %id, "ignoring set_text on a text node");
            return;
        }
        let old_children = match self.nodes.get_mut(&id) {
            Some(n) => std::mem::take(&mut n.children),
            None => return,
        };
        for child in &old_children {
            if let Some(c) = self.nodes.get_mut(child) {
                c.parent = None;
            }
        }
        let text_id = self.create_text_node(text);
        if let Some(n) = self.nodes.get_mut(&id) {
            n.children.push(text_id);
        }
        if let Some(t) = self.nodes.get_mut(&text_id) {
            t.parent = Some(id);
        }
        self.refresh_hashes(id);
    }

    /// Store `value` verbatim as the node's text value.
    ///
    /// Patch payloads carry values that were escaped when they entered the
    /// producing tree, so the applier must not escape them again.
    pub(crate) fn set_value_raw(&mut self, id: NodeId, value: &str) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        node.value = value.to_owned();
        self.refresh_hashes(id);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Clone and destroy
    // ─────────────────────────────────────────────────────────────────────────

    /// Copy the node: same tag, same attributes, same value, fresh
    /// identity, independently computed digest.
    ///
    /// With `deep`, children are cloned recursively and attached to the
    /// copy; otherwise the copy has none. Returns `None` for a dead id.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> Option<NodeId> {
        let src = self.nodes.get(&id)?;
        let tag = src.tag.clone();
        let attrs = src.attrs.clone();
        let value = src.value.clone();
        let children: SmallVec<[NodeId; 8]> = src.children.clone();

        let copy = NodeId::next();
        self.nodes.insert(
            copy,
            NodeData {
                tag,
                attrs,
                children: SmallVec::new(),
                value,
                parent: None,
                hash: 0,
            },
        );
        if deep {
            for child in children {
                if let Some(child_copy) = self.clone_node(child, true) {
                    if let Some(c) = self.nodes.get_mut(&copy) {
                        c.children.push(child_copy);
                    }
                    if let Some(cc) = self.nodes.get_mut(&child_copy) {
                        cc.parent = Some(copy);
                    }
                }
            }
        }
        self.refresh_hashes(copy);
        Some(copy)
    }

    /// Destroy the node and its whole subtree.
    ///
    /// Detaches from the parent first (repropagating digests there), then
    /// releases every node of the subtree. The retired identities are never
    /// reissued.
    pub fn destroy(&mut self, id: NodeId) {
        if !self.contains(id) {
            return;
        }
        self.detach(id);
        self.drop_subtree(id);
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        for child in node.children {
            self.drop_subtree(child);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Serialization
    // ─────────────────────────────────────────────────────────────────────────

    /// Serialize the subtree rooted at `id` to markup. Empty for dead ids.
    pub fn to_markup(&self, id: NodeId) -> String {
        self.get(id).map(render::to_markup).unwrap_or_default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Digest maintenance
    // ─────────────────────────────────────────────────────────────────────────

    /// Recompute the digest of `from` and of every ancestor up to the
    /// root. Runs synchronously inside every mutation; nothing observes a
    /// stale digest.
    fn refresh_hashes(&mut self, from: NodeId) {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            let Some(node) = self.nodes.get(&id) else {
                break;
            };
            let digest = node_digest(
                &node.tag,
                &node.attrs,
                &node.value,
                node.children
                    .iter()
                    .filter_map(|c| self.nodes.get(c))
                    .map(|c| c.hash),
            );
            let parent = node.parent;
            if let Some(node) = self.nodes.get_mut(&id) {
                node.hash = digest;
            }
            cursor = parent;
        }
    }

    /// Walk the parent chain of `of`, checking for `candidate`.
    fn is_ancestor(&self, candidate: NodeId, of: NodeId) -> bool {
        let mut cursor = self.parent(of);
        while let Some(id) = cursor {
            if id == candidate {
                return true;
            }
            cursor = self.parent(id);
        }
        false
    }
}

// =============================================================================
// ElementRef
// =============================================================================

/// Borrowed view of one node.
///
/// Bundles the tree borrow with the id so read-side code (the differ, the
/// serializer, equality checks) can walk subtrees without threading the
/// tree through every call. Cheap to copy.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a Tree,
    id: NodeId,
    data: &'a NodeData,
}

impl<'a> ElementRef<'a> {
    /// Identity of the node.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The tree this node lives in.
    #[inline]
    pub fn tree(&self) -> &'a Tree {
        self.tree
    }

    /// Tag name.
    #[inline]
    pub fn tag(&self) -> &'a str {
        self.data.tag.as_str()
    }

    /// Text value (empty for non-text nodes).
    #[inline]
    pub fn value(&self) -> &'a str {
        self.data.value.as_str()
    }

    /// Attribute pairs in insertion order.
    #[inline]
    pub fn attrs(&self) -> &'a Attrs {
        &self.data.attrs
    }

    /// One attribute value.
    pub fn attr(&self, key: &str) -> Option<&'a str> {
        self.data.attrs.get_attr(key)
    }

    /// Current subtree digest.
    #[inline]
    pub fn content_hash(&self) -> u64 {
        self.data.hash
    }

    /// Check whether this is a text node.
    #[inline]
    pub fn is_text(&self) -> bool {
        self.data.tag == TEXT_TAG
    }

    /// Parent node, if attached.
    pub fn parent(&self) -> Option<ElementRef<'a>> {
        self.data.parent.and_then(|p| self.tree.get(p))
    }

    /// Number of children.
    #[inline]
    pub fn child_count(&self) -> usize {
        self.data.children.len()
    }

    /// Children in order.
    pub fn children(&self) -> impl Iterator<Item = ElementRef<'a>> {
        let tree = self.tree;
        self.data.children.iter().filter_map(move |c| tree.get(*c))
    }

    /// Same node by own content: equal tag, equal attribute set, equal
    /// text value. Children are deliberately not compared. This is the
    /// differ's child match rule; whether a matched pair needs descending
    /// into is decided separately by the subtree digests.
    pub fn matches(&self, other: &ElementRef<'_>) -> bool {
        self.tag() == other.tag()
            && self.value() == other.value()
            && attrs_eq(self.attrs(), other.attrs())
    }

    /// Deep structural equality: own content plus children, recursively.
    /// Identity plays no part.
    pub fn subtree_eq(&self, other: &ElementRef<'_>) -> bool {
        self.matches(other)
            && self.child_count() == other.child_count()
            && self
                .children()
                .zip(other.children())
                .all(|(a, b)| a.subtree_eq(&b))
    }

    /// Serialize this subtree to markup.
    pub fn to_markup(&self) -> String {
        render::to_markup(*self)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Tree: Send, Sync);

    #[test]
    fn test_create_element_initial_state() {
        let mut tree = Tree::new();
        let div = tree.create_element("div");

        assert_eq!(tree.tag(div), Some("div"));
        assert_eq!(tree.value(div), Some(""));
        assert_eq!(tree.parent(div), None);
        assert!(tree.children(div).is_empty());
        assert!(!tree.is_text(div));
        assert!(tree.content_hash(div).is_some());
    }

    #[test]
    fn test_attribute_lookup_outcomes() {
        let mut tree = Tree::new();
        let div = tree.create_element("div");
        tree.set_attribute(div, "class", "box");

        assert_eq!(tree.attribute(div, "class"), Ok("box"));
        assert_eq!(
            tree.attribute(div, "id"),
            Err(TreeError::AttributeNotFound { key: "id".into() })
        );

        let dead = NodeId::from_raw(u64::MAX);
        assert_eq!(tree.attribute(dead, "class"), Err(TreeError::NodeNotFound(dead)));
    }

    #[test]
    fn test_attribute_mutation_changes_hash_and_restores() {
        let mut tree = Tree::new();
        let div = tree.create_element("div");
        let initial = tree.content_hash(div).unwrap();

        tree.set_attribute(div, "class", "box");
        let with_attr = tree.content_hash(div).unwrap();
        assert_ne!(initial, with_attr);

        tree.remove_attribute(div, "class");
        assert_eq!(tree.content_hash(div), Some(initial));

        // Removing an absent key changes nothing.
        tree.remove_attribute(div, "class");
        assert_eq!(tree.content_hash(div), Some(initial));
    }

    #[test]
    fn test_descendant_mutation_reaches_root_hash() {
        let mut tree = Tree::new();
        let root = tree.create_element("html");
        let body = tree.create_element("body");
        let p = tree.create_element("p");
        tree.append_child(root, body);
        tree.append_child(body, p);

        let root_before = tree.content_hash(root).unwrap();
        let body_before = tree.content_hash(body).unwrap();

        tree.set_attribute(p, "class", "lead");

        assert_ne!(tree.content_hash(root).unwrap(), root_before);
        assert_ne!(tree.content_hash(body).unwrap(), body_before);
    }

    #[test]
    fn test_append_child_move_semantics() {
        let mut tree = Tree::new();
        let a = tree.create_element("ul");
        let b = tree.create_element("ul");
        let li = tree.create_element("li");

        tree.append_child(a, li);
        assert_eq!(tree.children(a), &[li]);
        assert_eq!(tree.parent(li), Some(a));

        let a_with_li = tree.content_hash(a).unwrap();

        tree.append_child(b, li);
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[li]);
        assert_eq!(tree.parent(li), Some(b));
        // The abandoned parent's digest reflects the departure.
        assert_ne!(tree.content_hash(a).unwrap(), a_with_li);
    }

    #[test]
    fn test_append_to_same_parent_moves_to_end() {
        let mut tree = Tree::new();
        let ul = tree.create_element("ul");
        let first = tree.create_element("li");
        let second = tree.create_element("li");
        tree.append_child(ul, first);
        tree.append_child(ul, second);

        tree.append_child(ul, first);
        assert_eq!(tree.children(ul), &[second, first]);
    }

    #[test]
    fn test_text_node_rejects_children_and_attributes() {
        let mut tree = Tree::new();
        let text = tree.create_text_node("hi");
        let div = tree.create_element("div");

        tree.append_child(text, div);
        assert!(tree.children(text).is_empty());
        assert_eq!(tree.parent(div), None);

        tree.set_attribute(text, "class", "x");
        assert!(tree.attributes(text).is_empty());

        tree.set_text(text, "other");
        assert_eq!(tree.value(text), Some("hi"));
        assert!(tree.children(text).is_empty());
    }

    #[test]
    fn test_cycle_appends_are_rejected() {
        let mut tree = Tree::new();
        let a = tree.create_element("div");
        let b = tree.create_element("div");
        let c = tree.create_element("div");
        tree.append_child(a, b);
        tree.append_child(b, c);

        tree.append_child(c, a);
        assert!(tree.children(c).is_empty());
        assert_eq!(tree.parent(a), None);

        tree.append_child(a, a);
        assert_eq!(tree.children(a), &[b]);
    }

    #[test]
    fn test_set_text_replaces_children() {
        let mut tree = Tree::new();
        let p = tree.create_element("p");
        let span = tree.create_element("span");
        tree.append_child(p, span);

        tree.set_text(p, "hello");

        assert!(tree.has_child_nodes(p));
        assert_eq!(tree.children(p).len(), 1);
        let text = tree.children(p)[0];
        assert!(tree.is_text(text));
        assert_eq!(tree.value(text), Some("hello"));

        // The former child survives as a detached root.
        assert!(tree.contains(span));
        assert_eq!(tree.parent(span), None);
    }

    #[test]
    fn test_set_text_escapes_at_storage() {
        let mut tree = Tree::new();
        let p = tree.create_element("p");
        tree.set_text(p, "a < b & c");

        let text = tree.children(p)[0];
        assert_eq!(tree.value(text), Some("a &lt; b &amp; c"));
    }

    #[test]
    fn test_remove_child_by_identity() {
        let mut tree = Tree::new();
        let ul = tree.create_element("ul");
        let a = tree.create_element("li");
        let b = tree.create_element("li");
        tree.append_child(ul, a);
        tree.append_child(ul, b);

        tree.remove_child(ul, a);
        assert_eq!(tree.children(ul), &[b]);
        assert_eq!(tree.parent(a), None);
        assert!(tree.contains(a));

        // Not a child anymore: no-op.
        tree.remove_child(ul, a);
        assert_eq!(tree.children(ul), &[b]);
    }

    #[test]
    fn test_replace_child_swaps_in_place() {
        let mut tree = Tree::new();
        let ul = tree.create_element("ul");
        let a = tree.create_element("li");
        let b = tree.create_element("li");
        let c = tree.create_element("li");
        tree.append_child(ul, a);
        tree.append_child(ul, b);

        tree.replace_child(ul, a, c);
        assert_eq!(tree.children(ul), &[c, b]);
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.parent(c), Some(ul));
    }

    #[test]
    fn test_clone_shallow_and_deep() {
        let mut tree = Tree::new();
        let div = tree.create_element("div");
        tree.set_attribute(div, "class", "box");
        let p = tree.create_element("p");
        tree.append_child(div, p);
        tree.set_text(p, "hi");

        let shallow = tree.clone_node(div, false).unwrap();
        assert_ne!(shallow, div);
        assert_eq!(tree.tag(shallow), Some("div"));
        assert_eq!(tree.attribute(shallow, "class"), Ok("box"));
        assert!(tree.children(shallow).is_empty());

        let deep = tree.clone_node(div, true).unwrap();
        assert_ne!(deep, div);
        let (orig, copy) = (tree.get(div).unwrap(), tree.get(deep).unwrap());
        assert!(orig.subtree_eq(&copy));
        assert_eq!(tree.content_hash(deep), tree.content_hash(div));

        // Fresh identities throughout the deep copy.
        assert_ne!(tree.children(deep)[0], p);
    }

    #[test]
    fn test_clone_is_independent_of_source() {
        let mut tree = Tree::new();
        let div = tree.create_element("div");
        tree.set_attribute(div, "class", "a");
        let copy = tree.clone_node(div, true).unwrap();

        tree.set_attribute(div, "class", "b");
        assert_eq!(tree.attribute(copy, "class"), Ok("a"));
        assert_ne!(tree.content_hash(copy), tree.content_hash(div));
    }

    #[test]
    fn test_destroy_releases_subtree() {
        let mut tree = Tree::new();
        let root = tree.create_element("div");
        let child = tree.create_element("p");
        tree.append_child(root, child);
        tree.set_text(child, "hi");
        let text = tree.children(child)[0];
        assert_eq!(tree.len(), 3);

        let root_hash = tree.content_hash(root).unwrap();
        tree.destroy(child);

        assert_eq!(tree.len(), 1);
        assert!(!tree.contains(child));
        assert!(!tree.contains(text));
        assert!(tree.children(root).is_empty());
        assert_ne!(tree.content_hash(root).unwrap(), root_hash);

        // Destroying a dead id is a no-op.
        tree.destroy(child);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_matches_ignores_children() {
        let mut tree = Tree::new();
        let a = tree.create_element("div");
        let b = tree.create_element("div");
        let p = tree.create_element("p");
        tree.append_child(b, p);

        let (ra, rb) = (tree.get(a).unwrap(), tree.get(b).unwrap());
        assert!(ra.matches(&rb));
        assert!(!ra.subtree_eq(&rb));
    }

    #[test]
    fn test_matches_attr_order_irrelevant() {
        let mut tree = Tree::new();
        let a = tree.create_element("div");
        tree.set_attribute(a, "x", "1");
        tree.set_attribute(a, "y", "2");
        let b = tree.create_element("div");
        tree.set_attribute(b, "y", "2");
        tree.set_attribute(b, "x", "1");

        assert!(tree.get(a).unwrap().matches(&tree.get(b).unwrap()));
        assert_eq!(tree.content_hash(a), tree.content_hash(b));
    }

    #[test]
    fn test_deep_clone_hash_equality_regardless_of_build_order() {
        let mut tree = Tree::new();
        let a = tree.create_element("div");
        tree.set_attribute(a, "x", "1");
        tree.set_attribute(a, "y", "2");

        let b = tree.create_element("div");
        tree.set_attribute(b, "y", "2");
        tree.set_attribute(b, "x", "1");

        assert_eq!(tree.content_hash(a), tree.content_hash(b));
    }
}
