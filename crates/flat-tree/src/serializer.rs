//! Output strategies.
//!
//! [`flatten`] is the core primitive: one property map per node reachable
//! from the root, in pre-order, each starting with the configured id and
//! parent fields. Building a new tree from that listing with the same options
//! reproduces the same structure and the same listing.

use serde::Serialize;
use serde_json::Value;

use crate::error::TreeError;
use crate::graph::NodeGraph;
use crate::id::NodeId;
use crate::node::Node;
use crate::record::Record;

/// Turns a tree into its output value.
pub trait TreeSerializer: Send + Sync {
    fn serialize(&self, graph: &NodeGraph) -> Result<Value, TreeError>;
}

/// Default strategy: the [`flatten`] listing as a JSON array.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatSerializer;

impl TreeSerializer for FlatSerializer {
    fn serialize(&self, graph: &NodeGraph) -> Result<Value, TreeError> {
        Ok(Value::Array(
            flatten(graph).into_iter().map(Value::Object).collect(),
        ))
    }
}

/// Nested strategy: top-level nodes, each carrying a `children` array.
///
/// Leaves have no `children` key.
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedSerializer;

#[derive(Serialize)]
struct NestedEntry {
    #[serde(flatten)]
    fields: Record,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<NestedEntry>,
}

impl NestedSerializer {
    fn entry(graph: &NodeGraph, node: &Node) -> NestedEntry {
        NestedEntry {
            fields: flat_entry(graph, node),
            children: node
                .children()
                .iter()
                .map(|&child| Self::entry(graph, graph.node(child)))
                .collect(),
        }
    }
}

impl TreeSerializer for NestedSerializer {
    fn serialize(&self, graph: &NodeGraph) -> Result<Value, TreeError> {
        let top: Vec<NestedEntry> = graph
            .node(graph.root())
            .children()
            .iter()
            .map(|&child| Self::entry(graph, graph.node(child)))
            .collect();
        serde_json::to_value(top).map_err(|e| TreeError::Serialization(e.to_string()))
    }
}

/// Pre-order listing of every node reachable from the root.
pub fn flatten(graph: &NodeGraph) -> Vec<Record> {
    graph
        .preorder(graph.root(), false)
        .into_iter()
        .map(|index| flat_entry(graph, graph.node(index)))
        .collect()
}

/// One node's output map: id field, parent field, then the property bag in
/// stored order, skipping names already written.
pub fn flat_entry(graph: &NodeGraph, node: &Node) -> Record {
    let mut entry = Record::new();
    entry.insert(graph.id_key().to_string(), node.id().to_value());
    entry.insert(
        graph.parent_key().to_string(),
        node.parent_id().map_or(Value::Null, NodeId::to_value),
    );
    for (name, value) in node.properties() {
        if !entry.contains_key(name) {
            entry.insert(name.clone(), value.clone());
        }
    }
    entry
}
