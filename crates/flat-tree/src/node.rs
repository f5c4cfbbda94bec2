//! Node records.
//!
//! Attached nodes live in the arena of a [`NodeGraph`](crate::graph::NodeGraph)
//! and link to each other through [`NodeIndex`] values, never through owning
//! pointers. A [`DetachedNode`] is an owned node (with an owned subtree) that
//! belongs to no tree yet, or was removed from one.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::TreeError;
use crate::id::NodeId;

/// Ordered property bag, keyed by lower-cased field name.
pub type Properties = IndexMap<String, Value>;

/// Property mirroring the node id.
pub const ID_PROPERTY: &str = "id";
/// Property mirroring the parent id.
pub const PARENT_PROPERTY: &str = "parent";

/// Builds a property bag from raw record fields.
///
/// Field names are lower-cased; when two names fold to the same key the later
/// value wins but the first position is kept. `id` and `parent` are always
/// re-written last so both are present even when the record lacks them.
pub fn normalize_properties<I>(id: &NodeId, parent: Option<&NodeId>, fields: I) -> Properties
where
    I: IntoIterator<Item = (String, Value)>,
{
    let mut properties = Properties::new();
    for (name, value) in fields {
        let name = name.to_lowercase();
        if name == ID_PROPERTY || name == PARENT_PROPERTY {
            continue;
        }
        properties.insert(name, value);
    }
    properties.insert(ID_PROPERTY.to_string(), id.to_value());
    properties.insert(
        PARENT_PROPERTY.to_string(),
        parent.map_or(Value::Null, NodeId::to_value),
    );
    properties
}

/// Arena slot of an attached node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) u32);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node stored in a tree's arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) parent_id: Option<NodeId>,
    pub(crate) properties: Properties,
    pub(crate) parent: Option<NodeIndex>,
    pub(crate) children: Vec<NodeIndex>,
}

impl Node {
    pub(crate) fn new(id: NodeId, parent_id: Option<NodeId>, properties: Properties) -> Self {
        Self {
            id,
            parent_id,
            properties,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn root(id: NodeId) -> Self {
        let properties = normalize_properties(&id, None, std::iter::empty());
        Self::new(id, None, properties)
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Declared parent id; `None` for the root and for unlinked nodes.
    pub fn parent_id(&self) -> Option<&NodeId> {
        self.parent_id.as_ref()
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    pub(crate) fn link_parent(&mut self, parent: NodeIndex, parent_id: &NodeId) {
        self.parent = Some(parent);
        self.parent_id = Some(parent_id.clone());
        self.properties
            .insert(PARENT_PROPERTY.to_string(), parent_id.to_value());
    }

    pub(crate) fn unlink_parent(&mut self) {
        self.parent = None;
        self.parent_id = None;
        self.properties.shift_remove(PARENT_PROPERTY);
    }
}

/// A node outside of any tree, optionally carrying a pre-built subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct DetachedNode {
    id: NodeId,
    parent_id: Option<NodeId>,
    properties: Properties,
    children: Vec<DetachedNode>,
}

impl DetachedNode {
    /// Creates a node the way the builder does: field names are lower-cased
    /// and `id` / `parent` are mirrored into the property bag.
    pub fn new<I>(id: impl Into<NodeId>, parent_id: impl Into<NodeId>, fields: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let id = id.into();
        let parent_id = parent_id.into();
        let properties = normalize_properties(&id, Some(&parent_id), fields);
        Self {
            id,
            parent_id: Some(parent_id),
            properties,
            children: Vec::new(),
        }
    }

    pub(crate) fn from_node(node: Node) -> Self {
        Self {
            id: node.id,
            parent_id: node.parent_id,
            properties: node.properties,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn parent_id(&self) -> Option<&NodeId> {
        self.parent_id.as_ref()
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn children(&self) -> &[DetachedNode] {
        &self.children
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(&name.to_lowercase())
    }

    pub fn has_child(&self, id: &NodeId) -> bool {
        self.children.iter().any(|c| &c.id == id)
    }

    /// Appends `child` to this node's subtree.
    ///
    /// Fails when the id is already used by this node or one of its direct
    /// children.
    pub fn add_child(&mut self, mut child: DetachedNode) -> Result<(), TreeError> {
        if child.id == self.id || self.has_child(&child.id) {
            return Err(TreeError::DuplicateId(child.id));
        }
        child.parent_id = Some(self.id.clone());
        child
            .properties
            .insert(PARENT_PROPERTY.to_string(), self.id.to_value());
        self.children.push(child);
        Ok(())
    }

    /// Builder-style [`DetachedNode::add_child`].
    pub fn with_child(mut self, child: DetachedNode) -> Result<Self, TreeError> {
        self.add_child(child)?;
        Ok(self)
    }

    /// Ids of this node and its whole subtree, in pre-order.
    pub fn subtree_ids(&self) -> Vec<&NodeId> {
        let mut out = Vec::new();
        self.collect_ids(&mut out);
        out
    }

    fn collect_ids<'a>(&'a self, out: &mut Vec<&'a NodeId>) {
        out.push(&self.id);
        for child in &self.children {
            child.collect_ids(out);
        }
    }

    pub(crate) fn set_parent_id(&mut self, parent_id: &NodeId) {
        self.parent_id = Some(parent_id.clone());
        self.properties
            .insert(PARENT_PROPERTY.to_string(), parent_id.to_value());
    }

    pub(crate) fn into_parts(self) -> (Node, Vec<DetachedNode>) {
        (
            Node::new(self.id, self.parent_id, self.properties),
            self.children,
        )
    }
}
