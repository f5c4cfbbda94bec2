//! Flat records to linked node graph.
//!
//! Building happens in two passes so that a record may name a parent that
//! only appears later in the input, followed by one cycle sweep:
//!
//! 1. Every record becomes a node, is registered under its id, and is queued
//!    under its parent id (queues keep first-seen order).
//! 2. Each queue is linked to the node registered under its parent id. Links
//!    that would point at a missing node or at the node itself are handed to
//!    the configured [`BuildWarningPolicy`].
//! 3. A single walk over the parent links finds every cycle. In each cycle
//!    the link made last is cut again and reported as
//!    [`ParentFault::Cycle`].
//!
//! Every step is linear in the number of records.
//!
//! [`BuildWarningPolicy`]: crate::policy::BuildWarningPolicy

use indexmap::IndexMap;

use crate::error::{ParentFault, TreeError};
use crate::graph::NodeGraph;
use crate::id::NodeId;
use crate::node::{normalize_properties, Node, NodeIndex};
use crate::options::TreeOptions;
use crate::policy::BuildWarning;
use crate::record::IntoRecord;

/// Builds [`NodeGraph`]s according to one set of [`TreeOptions`].
pub struct TreeBuilder<'o> {
    options: &'o TreeOptions,
}

impl<'o> TreeBuilder<'o> {
    pub fn new(options: &'o TreeOptions) -> Self {
        Self { options }
    }

    /// Builds a fresh graph from `records`.
    ///
    /// Either the whole input links cleanly (modulo what the warning policy
    /// chooses to skip) or an error is returned and nothing is kept.
    pub fn build<I, R>(&self, records: I) -> Result<NodeGraph, TreeError>
    where
        I: IntoIterator<Item = R>,
        R: IntoRecord,
    {
        let options = self.options;
        let id_key = options.id_key();
        let parent_key = options.parent_key();
        let mut graph = NodeGraph::new(options.root_id().clone(), id_key, parent_key);
        let mut pending: IndexMap<NodeId, Vec<NodeIndex>> = IndexMap::new();
        let mut count = 0usize;

        for (position, raw) in records.into_iter().enumerate() {
            let record = raw.into_record()?;
            let id = match record.get(id_key) {
                Some(value) => NodeId::try_from_field(value, id_key)?,
                None => {
                    return Err(TreeError::InvalidDatatype(format!(
                        "record {position} has no \"{id_key}\" field"
                    )));
                }
            };
            let parent_id = match record.get(parent_key) {
                Some(value) => NodeId::try_from_field(value, parent_key)?,
                None => NodeId::Null,
            };
            if &id == graph.root_id() {
                return Err(TreeError::DuplicateId(id));
            }

            let properties = normalize_properties(&id, Some(&parent_id), record);
            let index = graph.push(Node::new(id.clone(), Some(parent_id.clone()), properties));
            if graph.register(id.clone(), index).is_some() {
                if options.rejects_duplicate_ids() {
                    return Err(TreeError::DuplicateId(id));
                }
                tracing::warn!(id = %id, position, "Duplicate id supersedes an earlier record");
            }
            pending.entry(parent_id).or_default().push(index);
            count += 1;
        }

        let mut linked = 0usize;
        let mut link_order: Vec<Option<usize>> = vec![None; graph.slot_count()];
        for (parent_id, children) in &pending {
            for &child in children {
                let fault = match graph.lookup(parent_id) {
                    None => Some(ParentFault::Missing),
                    Some(parent) if parent == child => Some(ParentFault::SelfReference),
                    Some(parent) => {
                        graph.attach(parent, child);
                        link_order[child.index()] = Some(linked);
                        linked += 1;
                        None
                    }
                };
                if let Some(fault) = fault {
                    let warning = BuildWarning {
                        node: graph.node(child),
                        parent_id,
                        fault,
                    };
                    options.build_warning().on_warning(&warning)?;
                }
            }
        }

        for child in closing_links(&graph, &link_order) {
            graph.cut(child);
            linked -= 1;
            let node = graph.node(child);
            let parent_id = node.parent_id().cloned().unwrap_or(NodeId::Null);
            let warning = BuildWarning {
                node,
                parent_id: &parent_id,
                fault: ParentFault::Cycle,
            };
            options.build_warning().on_warning(&warning)?;
        }

        tracing::debug!(
            records = count,
            linked,
            registered = graph.registered_len(),
            "Built node graph"
        );
        Ok(graph)
    }
}

/// For every cycle of parent links, the child whose link into the cycle was
/// made last.
///
/// Each node has at most one parent, so a walk up from any node either ends
/// at a parentless node or runs into a cycle. Walks stop at nodes an earlier
/// walk already visited, which keeps the sweep linear.
fn closing_links(graph: &NodeGraph, link_order: &[Option<usize>]) -> Vec<NodeIndex> {
    const UNSEEN: usize = usize::MAX;
    let mut walk = vec![UNSEEN; graph.slot_count()];
    let mut closing = Vec::new();
    for start in 0..graph.slot_count() {
        if walk[start] != UNSEEN {
            continue;
        }
        let mut at = Some(NodeIndex(start as u32));
        while let Some(index) = at {
            if walk[index.index()] != UNSEEN {
                break;
            }
            walk[index.index()] = start;
            at = graph.node(index).parent();
        }
        // Only a node marked by this very walk closes a new cycle.
        let Some(entry) = at.filter(|hit| walk[hit.index()] == start) else {
            continue;
        };
        let mut last = entry;
        let mut at = entry;
        while let Some(parent) = graph.node(at).parent() {
            if parent == entry {
                break;
            }
            if link_order[parent.index()] > link_order[last.index()] {
                last = parent;
            }
            at = parent;
        }
        closing.push(last);
    }
    closing
}
