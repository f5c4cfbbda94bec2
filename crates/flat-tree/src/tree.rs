//! The tree type and its read API.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::builder::TreeBuilder;
use crate::error::TreeError;
use crate::graph::NodeGraph;
use crate::id::NodeId;
use crate::node::NodeIndex;
use crate::options::TreeOptions;
use crate::policy::{Lookup, Mutability, Nullable, ReadOnly, Strict, Writable};
use crate::print::write_outline;
use crate::record::{records_from_value, IntoRecord, Record};
use crate::serializer::{flatten, FlatSerializer, TreeSerializer};
use crate::traverse::NodeRef;

/// A tree built from flat id/parent records.
///
/// `L` picks the lookup policy ([`Strict`] or [`Nullable`]) and `M` the
/// mutability capability ([`ReadOnly`] or [`Writable`]).
pub struct Tree<L: Lookup = Strict, M: Mutability = ReadOnly> {
    pub(crate) graph: NodeGraph,
    options: TreeOptions,
    _policy: PhantomData<fn() -> (L, M)>,
}

/// Read-only tree whose failed lookups return `None`.
pub type NullableTree = Tree<Nullable, ReadOnly>;

/// Editable tree whose failed lookups return `None`.
pub type WritableTree = Tree<Nullable, Writable>;

impl<L: Lookup, M: Mutability> Clone for Tree<L, M> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            options: self.options.clone(),
            _policy: PhantomData,
        }
    }
}

impl<L: Lookup, M: Mutability> fmt::Debug for Tree<L, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("writable", &M::WRITABLE)
            .field("options", &self.options)
            .field("registered", &self.graph.registered_len())
            .finish()
    }
}

/// Indented outline of the reachable nodes, one `- id` line each.
impl<L: Lookup, M: Mutability> fmt::Display for Tree<L, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_outline(&self.graph, f)
    }
}

impl<L: Lookup, M: Mutability> Serialize for Tree<L, M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

impl<L: Lookup, M: Mutability> Tree<L, M> {
    /// Builds a tree from `records`.
    pub fn new<I, R>(records: I, options: TreeOptions) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = R>,
        R: IntoRecord,
    {
        let graph = TreeBuilder::new(&options).build(records)?;
        Ok(Self {
            graph,
            options,
            _policy: PhantomData,
        })
    }

    /// Builds a tree from `records` with default options.
    pub fn from_records<I, R>(records: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = R>,
        R: IntoRecord,
    {
        Self::new(records, TreeOptions::default())
    }

    /// Builds a tree from a JSON array of record objects.
    pub fn from_json(data: Value, options: TreeOptions) -> Result<Self, TreeError> {
        Self::new(records_from_value(data)?, options)
    }

    /// A tree holding only the root.
    pub fn empty(options: TreeOptions) -> Self {
        let graph = NodeGraph::new(
            options.root_id().clone(),
            options.id_key(),
            options.parent_key(),
        );
        Self {
            graph,
            options,
            _policy: PhantomData,
        }
    }

    /// Discards the current nodes and builds again from `records`.
    ///
    /// On error the previous tree is kept untouched.
    pub fn rebuild_with_data<I, R>(&mut self, records: I) -> Result<(), TreeError>
    where
        I: IntoIterator<Item = R>,
        R: IntoRecord,
    {
        self.graph = TreeBuilder::new(&self.options).build(records)?;
        Ok(())
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    pub fn root_id(&self) -> &NodeId {
        self.graph.root_id()
    }

    pub fn id_key(&self) -> &str {
        self.graph.id_key()
    }

    pub fn parent_key(&self) -> &str {
        self.graph.parent_key()
    }

    pub fn root(&self) -> NodeRef<'_, L> {
        NodeRef::new(&self.graph, self.graph.root())
    }

    /// Handle for an arena slot handed out earlier by this tree.
    ///
    /// `None` once the slot has been vacated by a delete. Slots are reused by
    /// later inserts, so an old index may resolve to a newer node.
    pub fn node_at(&self, index: NodeIndex) -> Option<NodeRef<'_, L>> {
        self.graph
            .get(index)
            .map(|_| NodeRef::new(&self.graph, index))
    }

    /// Every node reachable from the root, root excluded, in pre-order.
    pub fn nodes(&self) -> Vec<NodeRef<'_, L>> {
        self.root().descendants()
    }

    /// The root's direct children, in link order.
    pub fn root_nodes(&self) -> Vec<NodeRef<'_, L>> {
        self.root().children()
    }

    /// Registry lookup.
    ///
    /// Finds nodes that are registered but unreachable from the root too.
    pub fn node_by_id(&self, id: impl Into<NodeId>) -> L::Output<NodeRef<'_, L>> {
        let id = id.into();
        match self.graph.lookup(&id) {
            Some(index) => L::found(NodeRef::new(&self.graph, index)),
            None => L::missing(TreeError::UnknownId(id)),
        }
    }

    /// Follows `search` down from the root, matching one level per value.
    ///
    /// At each level the first child whose property `name` equals the next
    /// value (type-sensitive) is taken. Returns the node matched by the last
    /// value, or `None` as soon as a level has no match or `search` is empty.
    pub fn node_by_value_path(&self, name: &str, search: &[Value]) -> Option<NodeRef<'_, L>> {
        let name = name.to_lowercase();
        let mut level = self.root_nodes();
        let mut found = None;
        for wanted in search {
            let hit = level
                .into_iter()
                .find(|node| node.properties().get(&name) == Some(wanted))?;
            level = hit.children();
            found = Some(hit);
        }
        found
    }

    /// Number of registered nodes, root excluded. Includes orphans.
    pub fn node_count(&self) -> usize {
        self.graph.registered_len()
    }

    /// Pre-order listing of property maps, id and parent fields first.
    pub fn flatten(&self) -> Vec<Record> {
        flatten(&self.graph)
    }

    /// Runs the configured serializer.
    pub fn to_json(&self) -> Result<Value, TreeError> {
        self.options.serializer().serialize(&self.graph)
    }

    pub fn set_serializer(&mut self, serializer: impl TreeSerializer + 'static) {
        self.options.set_serializer(Arc::new(serializer));
    }

    /// Goes back to the default [`FlatSerializer`].
    pub fn reset_serializer(&mut self) {
        self.options.set_serializer(Arc::new(FlatSerializer));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vehicles() -> Value {
        json!([
            {"id": "vehicle", "parent": ""},
            {"id": "bicycle", "parent": "vehicle"},
            {"id": "car", "parent": "vehicle"},
            {"id": "building", "parent": ""},
            {"id": "school", "parent": "building"},
            {"id": "library", "parent": "building"},
            {"id": "primary-school", "parent": "school"},
        ])
    }

    fn ids<L: Lookup>(nodes: &[NodeRef<'_, L>]) -> Vec<String> {
        nodes.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn builds_vehicle_scenario() {
        let tree: Tree =
            Tree::from_json(vehicles(), TreeOptions::new().with_root_id("")).unwrap();
        assert_eq!(ids(&tree.root_nodes()), ["vehicle", "building"]);
        assert_eq!(
            ids(&tree.nodes()),
            ["vehicle", "bicycle", "car", "building", "school", "primary-school", "library"]
        );
    }

    #[test]
    fn strict_and_nullable_lookups() {
        let strict: Tree =
            Tree::from_json(vehicles(), TreeOptions::new().with_root_id("")).unwrap();
        assert_eq!(
            strict.node_by_id("nope").unwrap_err(),
            TreeError::UnknownId(NodeId::from("nope"))
        );
        assert_eq!(strict.node_by_id("car").unwrap().level(), 2);

        let nullable: NullableTree =
            Tree::from_json(vehicles(), TreeOptions::new().with_root_id("")).unwrap();
        assert!(nullable.node_by_id("nope").is_none());
        assert!(nullable.node_by_id("car").is_some());
    }

    #[test]
    fn display_outline() {
        let tree: Tree =
            Tree::from_json(vehicles(), TreeOptions::new().with_root_id("")).unwrap();
        assert_eq!(
            tree.to_string(),
            "- vehicle\n  - bicycle\n  - car\n- building\n  - school\n    - primary-school\n  - library"
        );
    }

    #[test]
    fn failed_rebuild_keeps_previous_nodes() {
        let mut tree: Tree =
            Tree::from_json(vehicles(), TreeOptions::new().with_root_id("")).unwrap();
        let err = tree
            .rebuild_with_data(vec![json!({"id": "x", "parent": "missing"})])
            .unwrap_err();
        assert!(err.is_invalid_parent());
        assert_eq!(tree.nodes().len(), 7);

        tree.rebuild_with_data(vec![json!({"id": "x", "parent": ""})])
            .unwrap();
        assert_eq!(ids(&tree.nodes()), ["x"]);
    }

    #[test]
    fn empty_tree_has_only_root() {
        let tree: Tree = Tree::empty(TreeOptions::default());
        assert!(tree.nodes().is_empty());
        assert_eq!(tree.node_count(), 0);
        assert!(tree.root().is_root());
        assert_eq!(tree.to_json().unwrap(), json!([]));
    }
}
