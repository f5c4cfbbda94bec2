//! Read-only walks over attached nodes.

use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;

use crate::error::TreeError;
use crate::graph::NodeGraph;
use crate::id::NodeId;
use crate::node::{Node, NodeIndex, Properties};
use crate::policy::{Lookup, Strict};
use crate::record::Record;

/// Borrowed handle to one node of a tree.
///
/// `L` decides what [`NodeRef::get`] returns for an undefined property.
pub struct NodeRef<'a, L: Lookup = Strict> {
    graph: &'a NodeGraph,
    index: NodeIndex,
    _lookup: PhantomData<fn() -> L>,
}

impl<L: Lookup> Clone for NodeRef<'_, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: Lookup> Copy for NodeRef<'_, L> {}

impl<L: Lookup> PartialEq for NodeRef<'_, L> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.index == other.index
    }
}

impl<L: Lookup> Eq for NodeRef<'_, L> {}

impl<L: Lookup> fmt::Debug for NodeRef<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", self.id())
            .field("index", &self.index)
            .finish()
    }
}

/// Renders the node id.
impl<L: Lookup> fmt::Display for NodeRef<'_, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.id(), f)
    }
}

impl<'a, L: Lookup> NodeRef<'a, L> {
    pub(crate) fn new(graph: &'a NodeGraph, index: NodeIndex) -> Self {
        Self {
            graph,
            index,
            _lookup: PhantomData,
        }
    }

    fn wrap(&self, indices: impl IntoIterator<Item = NodeIndex>) -> Vec<NodeRef<'a, L>> {
        indices
            .into_iter()
            .map(|index| NodeRef::new(self.graph, index))
            .collect()
    }

    pub fn index(&self) -> NodeIndex {
        self.index
    }

    pub fn node(&self) -> &'a Node {
        self.graph.node(self.index)
    }

    pub fn id(&self) -> &'a NodeId {
        self.node().id()
    }

    pub fn parent_id(&self) -> Option<&'a NodeId> {
        self.node().parent_id()
    }

    pub fn is_root(&self) -> bool {
        self.index == self.graph.root()
    }

    pub fn properties(&self) -> &'a Properties {
        self.node().properties()
    }

    /// Reads a property by (case-insensitive) name.
    pub fn get(&self, name: &str) -> L::Output<&'a Value> {
        match self.properties().get(&name.to_lowercase()) {
            Some(value) => L::found(value),
            None => L::missing(TreeError::UndefinedProperty {
                name: name.to_string(),
                id: self.id().clone(),
            }),
        }
    }

    /// Snapshot of the whole property bag, id and parent included.
    pub fn to_map(&self) -> Record {
        self.properties()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn parent(&self) -> Option<NodeRef<'a, L>> {
        self.node().parent().map(|p| NodeRef::new(self.graph, p))
    }

    pub fn children(&self) -> Vec<NodeRef<'a, L>> {
        self.wrap(self.node().children().iter().copied())
    }

    pub fn has_children(&self) -> bool {
        !self.node().children().is_empty()
    }

    pub fn count_children(&self) -> usize {
        self.node().children().len()
    }

    /// Distance from the root; the root is level 0.
    pub fn level(&self) -> usize {
        self.graph.level(self.index)
    }

    pub fn siblings(&self) -> Vec<NodeRef<'a, L>> {
        self.siblings_generic(false)
    }

    pub fn siblings_and_self(&self) -> Vec<NodeRef<'a, L>> {
        self.siblings_generic(true)
    }

    fn siblings_generic(&self, include_self: bool) -> Vec<NodeRef<'a, L>> {
        let Some(parent) = self.node().parent() else {
            return Vec::new();
        };
        self.wrap(
            self.graph
                .node(parent)
                .children()
                .iter()
                .copied()
                .filter(|&c| include_self || c != self.index),
        )
    }

    pub fn preceding_sibling(&self) -> Option<NodeRef<'a, L>> {
        self.sibling(-1)
    }

    pub fn following_sibling(&self) -> Option<NodeRef<'a, L>> {
        self.sibling(1)
    }

    fn sibling(&self, offset: isize) -> Option<NodeRef<'a, L>> {
        let parent = self.node().parent()?;
        let siblings = self.graph.node(parent).children();
        let position = siblings.iter().position(|&c| c == self.index)?;
        let target = position.checked_add_signed(offset)?;
        siblings
            .get(target)
            .map(|&index| NodeRef::new(self.graph, index))
    }

    /// Pre-order listing of the subtree below this node.
    pub fn descendants(&self) -> Vec<NodeRef<'a, L>> {
        self.wrap(self.graph.preorder(self.index, false))
    }

    pub fn descendants_and_self(&self) -> Vec<NodeRef<'a, L>> {
        self.wrap(self.graph.preorder(self.index, true))
    }

    /// Nearest ancestor first; the root is the last element.
    pub fn ancestors(&self) -> Vec<NodeRef<'a, L>> {
        self.wrap(self.graph.ancestors(self.index, false))
    }

    pub fn ancestors_and_self(&self) -> Vec<NodeRef<'a, L>> {
        self.wrap(self.graph.ancestors(self.index, true))
    }
}
