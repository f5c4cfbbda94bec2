use std::fmt;

use thiserror::Error;

use crate::id::NodeId;

/// Why a record could not be linked to the parent it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentFault {
    /// The record names its own id as parent id.
    SelfReference,
    /// No record (and not the root) carries the parent id.
    Missing,
    /// Linking would close a parent chain back onto the record.
    Cycle,
    /// Any other inconsistency a custom policy wants to report.
    Unrecognized,
}

impl fmt::Display for ParentFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParentFault::SelfReference => "references its own id as parent id",
            ParentFault::Missing => "points to a non-existent parent",
            ParentFault::Cycle => "would close a parent cycle",
            ParentFault::Unrecognized => "unrecognized build warning reason",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("invalid datatype: {0}")]
    InvalidDatatype(String),

    #[error("node with id {id} {fault} (parent id: {parent})")]
    InvalidParent {
        id: NodeId,
        parent: NodeId,
        fault: ParentFault,
    },

    #[error("option \"{option}\" {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("unknown node id: {0}")]
    UnknownId(NodeId),

    #[error("undefined property: {name} (node id: {id})")]
    UndefinedProperty { name: String, id: NodeId },

    #[error("node id {0} is already in use, delete it before adding a new one")]
    DuplicateId(NodeId),

    #[error("the root node cannot be deleted or moved")]
    RootNode,

    #[error("node {0} is not attached to this tree")]
    NotAttached(NodeId),

    #[error("cannot move node {id} below its own subtree node {parent}")]
    MoveIntoDescendant { id: NodeId, parent: NodeId },

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl TreeError {
    pub(crate) fn invalid_option(option: &str, reason: impl Into<String>) -> Self {
        TreeError::InvalidOption {
            option: option.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for the invalid-parent family of build errors.
    pub fn is_invalid_parent(&self) -> bool {
        matches!(self, TreeError::InvalidParent { .. })
    }
}
