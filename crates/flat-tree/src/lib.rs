//! Hierarchies from flat id/parent records.
//!
//! Builds an in-memory tree out of rows that reference each other through a
//! parent id (categories, org charts, file listings stored in tables or API
//! payloads), walks it, edits it, and flattens it back into rows.
//!
//! All nodes of a tree live in one arena owned by the tree; links between
//! nodes are arena indices, and a registry maps every id to its slot. Every
//! top-level record hangs below a synthetic root whose id is configurable
//! (default `0`).
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`builder`] | two-pass record linking, [`TreeBuilder`] |
//! [`graph`] | arena + registry, [`NodeGraph`] |
//! [`traverse`] | read-only walks, [`NodeRef`] |
//! [`tree`] | [`Tree`] and its read API |
//! [`mutate`] | edits available on `Tree<_, Writable>` |
//! [`serializer`] | [`flatten`] and the output strategies |
//! [`policy`] | lookup / mutability / build-warning policies |
//!
//! # Example
//!
//! ```
//! use flat_tree::{Tree, TreeOptions};
//! use serde_json::json;
//!
//! let data = json!([
//!     {"id": "vehicle", "parent": ""},
//!     {"id": "car", "parent": "vehicle"},
//!     {"id": "building", "parent": ""},
//! ]);
//! let tree: Tree = Tree::from_json(data, TreeOptions::new().with_root_id("")).unwrap();
//!
//! let ids: Vec<String> = tree.nodes().iter().map(|n| n.to_string()).collect();
//! assert_eq!(ids, ["vehicle", "car", "building"]);
//!
//! let car = tree.node_by_id("car").unwrap();
//! assert_eq!(car.level(), 2);
//! assert_eq!(car.parent().unwrap().id().as_str(), Some("vehicle"));
//!
//! // Flattening and rebuilding gives back the same rows.
//! let rows = tree.flatten();
//! let again: Tree = Tree::new(rows.clone(), TreeOptions::new().with_root_id("")).unwrap();
//! assert_eq!(again.flatten(), rows);
//! ```
//!
//! # Editing
//!
//! ```
//! use flat_tree::{Tree, TreeOptions, WritableTree};
//! use serde_json::json;
//!
//! let data = json!([{"id": 1, "parent": 0}, {"id": 2, "parent": 1}]);
//! let mut tree: WritableTree = Tree::from_json(data, TreeOptions::default()).unwrap();
//!
//! let node = tree.create_node(3, 0, vec![("name".to_string(), json!("three"))]);
//! tree.add_child(2, node).unwrap();
//! assert_eq!(tree.node_by_id(3).unwrap().get("NAME"), Some(&json!("three")));
//!
//! let removed = tree.delete(2).unwrap();
//! assert_eq!(removed.len(), 2);
//! assert!(tree.node_by_id(3).is_none());
//! ```

pub mod builder;
pub mod error;
pub mod graph;
pub mod id;
pub mod mutate;
pub mod node;
pub mod options;
pub mod policy;
mod print;
pub mod record;
pub mod serializer;
pub mod traverse;
pub mod tree;

pub use builder::TreeBuilder;
pub use error::{ParentFault, TreeError};
pub use graph::NodeGraph;
pub use id::NodeId;
pub use node::{normalize_properties, DetachedNode, Node, NodeIndex, Properties};
pub use options::TreeOptions;
pub use policy::{
    BuildWarning, BuildWarningPolicy, FailFast, Lookup, Mutability, Nullable, ReadOnly,
    SkipInvalid, Strict, Writable,
};
pub use record::{IntoRecord, Record};
pub use serializer::{flat_entry, flatten, FlatSerializer, NestedSerializer, TreeSerializer};
pub use traverse::NodeRef;
pub use tree::{NullableTree, Tree, WritableTree};
