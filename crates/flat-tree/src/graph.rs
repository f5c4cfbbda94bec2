//! Arena-backed node graph.
//!
//! [`NodeGraph`] is the sole owner of every node of a tree. Nodes sit in a
//! `Vec` arena; parent and child links are [`NodeIndex`] values into that
//! arena, and the registry maps each [`NodeId`] to its current slot.
//!
//! Deleting a node vacates its slot. Vacant slots are unreachable through the
//! registry and through [`NodeGraph::get`], and later inserts reuse them, so
//! a [`NodeIndex`] held across a delete may come to name a different node.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::id::NodeId;
use crate::node::{DetachedNode, Node, NodeIndex};

#[derive(Debug, Clone)]
pub struct NodeGraph {
    arena: Vec<Node>,
    vacant: Vec<bool>,
    free: Vec<NodeIndex>,
    registry: IndexMap<NodeId, NodeIndex>,
    root: NodeIndex,
    id_key: String,
    parent_key: String,
}

impl NodeGraph {
    /// Creates a graph holding only the synthetic root.
    pub(crate) fn new(root_id: NodeId, id_key: &str, parent_key: &str) -> Self {
        let mut graph = Self {
            arena: Vec::new(),
            vacant: Vec::new(),
            free: Vec::new(),
            registry: IndexMap::new(),
            root: NodeIndex(0),
            id_key: id_key.to_string(),
            parent_key: parent_key.to_string(),
        };
        let root = graph.push(Node::root(root_id.clone()));
        graph.registry.insert(root_id, root);
        graph.root = root;
        graph
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn root_id(&self) -> &NodeId {
        self.node(self.root).id()
    }

    /// Field name holding a record's id.
    pub fn id_key(&self) -> &str {
        &self.id_key
    }

    /// Field name holding a record's parent id.
    pub fn parent_key(&self) -> &str {
        &self.parent_key
    }

    /// The node in slot `index`, or `None` for an unknown or vacant slot.
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        match self.vacant.get(index.index()) {
            Some(false) => self.arena.get(index.index()),
            _ => None,
        }
    }

    pub(crate) fn node(&self, index: NodeIndex) -> &Node {
        &self.arena[index.index()]
    }

    pub(crate) fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.arena[index.index()]
    }

    /// Registry lookup, O(1).
    pub fn lookup(&self, id: &NodeId) -> Option<NodeIndex> {
        self.registry.get(id).copied()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.registry.contains_key(id)
    }

    /// Registered ids, root included, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.registry.keys()
    }

    /// Number of registered nodes, root excluded.
    pub fn registered_len(&self) -> usize {
        self.registry.len().saturating_sub(1)
    }

    /// Arena slots, vacant ones included.
    pub fn slot_count(&self) -> usize {
        self.arena.len()
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeIndex {
        if let Some(index) = self.free.pop() {
            self.arena[index.index()] = node;
            self.vacant[index.index()] = false;
            return index;
        }
        self.arena.push(node);
        self.vacant.push(false);
        NodeIndex((self.arena.len() - 1) as u32)
    }

    /// Points `id` at `index`, returning the slot it superseded.
    pub(crate) fn register(&mut self, id: NodeId, index: NodeIndex) -> Option<NodeIndex> {
        self.registry.insert(id, index)
    }

    /// Removes `index` from the registry if its id still maps to it.
    pub(crate) fn unregister(&mut self, index: NodeIndex) {
        let id = self.node(index).id();
        if self.registry.get(id) == Some(&index) {
            let id = id.clone();
            self.registry.shift_remove(&id);
        }
    }

    /// Appends `child` to `parent`'s children and points `child` back at it.
    pub(crate) fn attach(&mut self, parent: NodeIndex, child: NodeIndex) {
        let parent_id = self.node(parent).id().clone();
        self.node_mut(parent).children.push(child);
        self.node_mut(child).link_parent(parent, &parent_id);
    }

    /// The node whose children list `child`.
    ///
    /// Follows the back-link when there is one. A node whose back-link was
    /// cleared on its own may still be listed by its former parent, which is
    /// then found by scanning the arena.
    pub(crate) fn listing_parent(&self, child: NodeIndex) -> Option<NodeIndex> {
        if let Some(parent) = self.node(child).parent() {
            return Some(parent);
        }
        self.arena
            .iter()
            .zip(&self.vacant)
            .position(|(node, &vacant)| !vacant && node.children.contains(&child))
            .map(|i| NodeIndex(i as u32))
    }

    /// Removes `child` from its parent's children and clears its back-link.
    pub(crate) fn detach(&mut self, child: NodeIndex) {
        if let Some(parent) = self.listing_parent(child) {
            self.node_mut(parent).children.retain(|&c| c != child);
        }
        self.node_mut(child).unlink_parent();
    }

    /// Drops the link between `child` and its parent, keeping the parent id
    /// and properties the child declared.
    pub(crate) fn cut(&mut self, child: NodeIndex) {
        if let Some(parent) = self.node_mut(child).parent.take() {
            self.node_mut(parent).children.retain(|&c| c != child);
        }
    }

    /// Moves a record out of its slot and frees the slot for reuse.
    pub(crate) fn evict(&mut self, index: NodeIndex) -> DetachedNode {
        self.unregister(index);
        let slot = self.node_mut(index);
        let node = Node {
            id: slot.id.clone(),
            parent_id: slot.parent_id.take(),
            properties: std::mem::take(&mut slot.properties),
            parent: slot.parent.take(),
            children: std::mem::take(&mut slot.children),
        };
        self.vacant[index.index()] = true;
        self.free.push(index);
        DetachedNode::from_node(node)
    }

    /// Pre-order walk below `from`: each child is followed by its whole
    /// subtree before the next sibling.
    pub fn preorder(&self, from: NodeIndex, include_self: bool) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        if include_self {
            out.push(from);
        }
        let mut stack: Vec<NodeIndex> = self.node(from).children().iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            out.push(index);
            stack.extend(self.node(index).children().iter().rev().copied());
        }
        out
    }

    /// Nearest ancestor first, ending with the root.
    pub fn ancestors(&self, from: NodeIndex, include_self: bool) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        if include_self {
            out.push(from);
        }
        let mut current = self.node(from).parent();
        while let Some(index) = current {
            out.push(index);
            current = self.node(index).parent();
        }
        out
    }

    /// Number of parent links between `index` and the top of its chain.
    pub fn level(&self, index: NodeIndex) -> usize {
        let mut level = 0;
        let mut current = self.node(index).parent();
        while let Some(parent) = current {
            level += 1;
            current = self.node(parent).parent();
        }
        level
    }

    /// Whether walking up parent links from `index` reaches `ancestor`.
    /// A node counts as being in its own subtree.
    pub fn is_in_subtree(&self, ancestor: NodeIndex, index: NodeIndex) -> bool {
        let mut current = Some(index);
        while let Some(at) = current {
            if at == ancestor {
                return true;
            }
            current = self.node(at).parent();
        }
        false
    }

    /// Rebuilds the registry and arena from a fresh walk from the root.
    ///
    /// Nodes not reachable from the root are dropped, back-links are reset to
    /// the structure the walk saw, and every [`NodeIndex`] handed out before
    /// the call becomes invalid.
    pub(crate) fn regenerate(&mut self) {
        let before = self.registry.len();
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            if self.vacant[index.index()] || !seen.insert(index) {
                continue;
            }
            order.push(index);
            stack.extend(self.node(index).children().iter().rev().copied());
        }

        let remap: HashMap<NodeIndex, NodeIndex> = order
            .iter()
            .enumerate()
            .map(|(new, old)| (*old, NodeIndex(new as u32)))
            .collect();

        let mut old_arena: Vec<Option<Node>> =
            std::mem::take(&mut self.arena).into_iter().map(Some).collect();
        let mut arena = Vec::with_capacity(order.len());
        let mut registry = IndexMap::with_capacity(order.len());
        let mut claimed = HashSet::new();
        for old in &order {
            let Some(mut node) = old_arena[old.index()].take() else {
                continue;
            };
            // A child listed under two parents stays with the first one walked.
            node.children.retain(|c| claimed.insert(*c));
            node.children = node.children.iter().filter_map(|c| remap.get(c).copied()).collect();
            node.parent = None;
            registry.insert(node.id.clone(), NodeIndex(arena.len() as u32));
            arena.push(node);
        }
        self.vacant = vec![false; arena.len()];
        self.free.clear();
        self.arena = arena;
        self.registry = registry;
        self.root = NodeIndex(0);

        for parent in 0..self.arena.len() {
            let parent = NodeIndex(parent as u32);
            let parent_id = self.node(parent).id().clone();
            let children = self.node(parent).children().to_vec();
            for child in children {
                self.node_mut(child).link_parent(parent, &parent_id);
            }
        }

        tracing::debug!(
            registered = self.registry.len(),
            dropped = before.saturating_sub(self.registry.len()),
            "Regenerated node registry"
        );
    }
}
