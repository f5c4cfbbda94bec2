//! Structural edits for writable trees.
//!
//! Every operation checks all of its preconditions before it touches the
//! graph, so a failed call leaves nodes, links and registry exactly as they
//! were.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{ParentFault, TreeError};
use crate::id::NodeId;
use crate::node::{DetachedNode, NodeIndex};
use crate::policy::{Lookup, Writable};
use crate::tree::Tree;

impl<L: Lookup> Tree<L, Writable> {
    /// Creates a node for later use with [`Tree::add_child`] or
    /// [`Tree::add_node`]. The node is not part of the tree yet.
    pub fn create_node<I>(
        &self,
        id: impl Into<NodeId>,
        parent_id: impl Into<NodeId>,
        fields: I,
    ) -> DetachedNode
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        DetachedNode::new(id, parent_id, fields)
    }

    /// Registry membership.
    pub fn contains_node(&self, id: impl Into<NodeId>) -> bool {
        self.graph.contains(&id.into())
    }

    /// Whether `parent_id` lists a direct child with `child_id`.
    pub fn has_child(&self, parent_id: impl Into<NodeId>, child_id: impl Into<NodeId>) -> bool {
        let child_id = child_id.into();
        self.graph.lookup(&parent_id.into()).is_some_and(|parent| {
            self.graph
                .node(parent)
                .children()
                .iter()
                .any(|&c| self.graph.node(c).id() == &child_id)
        })
    }

    fn attached(&self, id: &NodeId) -> Result<NodeIndex, TreeError> {
        self.graph
            .lookup(id)
            .ok_or_else(|| TreeError::NotAttached(id.clone()))
    }

    fn attached_non_root(&self, id: &NodeId) -> Result<NodeIndex, TreeError> {
        let index = self.attached(id)?;
        if index == self.graph.root() {
            return Err(TreeError::RootNode);
        }
        Ok(index)
    }

    /// Rejects subtrees reusing a registered id or repeating an id.
    fn ensure_ids_free(&self, node: &DetachedNode) -> Result<(), TreeError> {
        let mut seen = HashSet::new();
        for id in node.subtree_ids() {
            if self.graph.contains(id) || !seen.insert(id) {
                return Err(TreeError::DuplicateId(id.clone()));
            }
        }
        Ok(())
    }

    fn graft(&mut self, parent: NodeIndex, node: DetachedNode) -> NodeIndex {
        let (node, children) = node.into_parts();
        let id = node.id().clone();
        let index = self.graph.push(node);
        self.graph.attach(parent, index);
        self.graph.register(id, index);
        for child in children {
            self.graft(index, child);
        }
        index
    }

    /// Appends `child` (and any subtree it carries) below `parent_id`.
    ///
    /// Fails if the parent is not registered, or if any id of the subtree is
    /// already a child of the parent or registered anywhere in the tree.
    pub fn add_child(
        &mut self,
        parent_id: impl Into<NodeId>,
        child: DetachedNode,
    ) -> Result<NodeIndex, TreeError> {
        let parent = self.attached(&parent_id.into())?;
        self.ensure_ids_free(&child)?;
        Ok(self.graft(parent, child))
    }

    /// Registers `node` under the parent it declares, grafting its subtree.
    pub fn add_node(&mut self, node: DetachedNode) -> Result<NodeIndex, TreeError> {
        self.ensure_ids_free(&node)?;
        let parent_id = node.parent_id().cloned().unwrap_or(NodeId::Null);
        let Some(parent) = self.graph.lookup(&parent_id) else {
            return Err(TreeError::InvalidParent {
                id: node.id().clone(),
                parent: parent_id,
                fault: ParentFault::Missing,
            });
        };
        Ok(self.graft(parent, node))
    }

    /// Removes the node and its whole subtree, returning them in pre-order.
    pub fn delete(&mut self, id: impl Into<NodeId>) -> Result<Vec<DetachedNode>, TreeError> {
        let id = id.into();
        let index = self.attached_non_root(&id)?;
        let doomed = self.graph.preorder(index, true);
        self.graph.detach(index);
        let removed: Vec<DetachedNode> = doomed.into_iter().map(|i| self.graph.evict(i)).collect();
        tracing::debug!(id = %id, removed = removed.len(), "Deleted subtree");
        Ok(removed)
    }

    /// Removes everything below the node, keeping the node itself.
    pub fn delete_descendants(
        &mut self,
        id: impl Into<NodeId>,
    ) -> Result<Vec<DetachedNode>, TreeError> {
        let id = id.into();
        let index = self.attached_non_root(&id)?;
        let doomed = self.graph.preorder(index, false);
        self.graph.node_mut(index).children.clear();
        let removed: Vec<DetachedNode> = doomed.into_iter().map(|i| self.graph.evict(i)).collect();
        tracing::debug!(id = %id, removed = removed.len(), "Deleted descendants");
        Ok(removed)
    }

    /// Removes only the node; its direct children move to its former parent,
    /// after that parent's existing children, keeping their own subtrees.
    pub fn delete_but_save_descendants(
        &mut self,
        id: impl Into<NodeId>,
    ) -> Result<DetachedNode, TreeError> {
        let id = id.into();
        let index = self.attached_non_root(&id)?;
        let Some(parent) = self.graph.listing_parent(index) else {
            return Err(TreeError::NotAttached(id));
        };
        let children = std::mem::take(&mut self.graph.node_mut(index).children);
        self.graph.detach(index);
        for &child in &children {
            self.graph.attach(parent, child);
        }
        tracing::debug!(id = %id, promoted = children.len(), "Deleted node, kept descendants");
        Ok(self.graph.evict(index))
    }

    /// Reparents a registered node, keeping its id and subtree. The node is
    /// appended after the new parent's existing children.
    pub fn move_node(
        &mut self,
        id: impl Into<NodeId>,
        new_parent_id: impl Into<NodeId>,
    ) -> Result<(), TreeError> {
        let id = id.into();
        let new_parent_id = new_parent_id.into();
        let index = self.attached_non_root(&id)?;
        let new_parent = self.attached(&new_parent_id)?;
        if self.graph.is_in_subtree(index, new_parent) {
            return Err(TreeError::MoveIntoDescendant {
                id,
                parent: new_parent_id,
            });
        }
        self.graph.detach(index);
        self.graph.attach(new_parent, index);
        Ok(())
    }

    /// Drops `child_id` from the parent's children and clears the child's
    /// back-link. The registry is left as is; see
    /// [`Tree::regenerate_nodes_list`].
    pub fn unset_child_by_id(
        &mut self,
        parent_id: impl Into<NodeId>,
        child_id: impl Into<NodeId>,
    ) -> Result<(), TreeError> {
        let parent = self.attached(&parent_id.into())?;
        let child_id = child_id.into();
        let graph = &mut self.graph;
        let position = graph
            .node(parent)
            .children()
            .iter()
            .position(|&c| graph.node(c).id() == &child_id);
        if let Some(position) = position {
            let child = graph.node_mut(parent).children.remove(position);
            graph.node_mut(child).unlink_parent();
        }
        Ok(())
    }

    /// Clears the node's back-link (and its `parent` property) only. The
    /// former parent still lists it and the registry is left as is.
    pub fn unset_parent(&mut self, id: impl Into<NodeId>) -> Result<(), TreeError> {
        let index = self.attached(&id.into())?;
        self.graph.node_mut(index).unlink_parent();
        Ok(())
    }

    /// Rebuilds the registry from a fresh walk from the root.
    ///
    /// Repairs the registry after [`Tree::unset_child_by_id`] /
    /// [`Tree::unset_parent`] edits: unreachable nodes are dropped and
    /// back-links follow the children lists again. Previously obtained
    /// [`NodeIndex`] values are invalidated.
    pub fn regenerate_nodes_list(&mut self) {
        self.graph.regenerate();
    }
}
