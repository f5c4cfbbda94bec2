//! Node identifiers.
//!
//! Ids read out of records are scalars: strings, integers or floats. The root
//! id may additionally be `null`. Comparison is type-sensitive, so the integer
//! `1` and the string `"1"` name different nodes. Integers keep their exact
//! value over the whole `i64` and `u64` range.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

use crate::error::TreeError;

/// Identifier of a node within one tree.
#[derive(Debug, Clone)]
pub enum NodeId {
    Null,
    Int(i64),
    /// Integers above `i64::MAX`; smaller ones are always `Int`.
    UInt(u64),
    Float(f64),
    Str(String),
}

impl NodeId {
    /// Reads an id out of a JSON scalar.
    ///
    /// Returns `None` for booleans, arrays and objects.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(NodeId::Null),
            Value::String(s) => Some(NodeId::Str(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(NodeId::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Some(NodeId::UInt(u))
                } else {
                    n.as_f64().map(NodeId::Float)
                }
            }
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Like [`NodeId::from_value`], reporting which field held the bad value.
    pub(crate) fn try_from_field(value: &Value, field: &str) -> Result<Self, TreeError> {
        Self::from_value(value).ok_or_else(|| {
            TreeError::InvalidDatatype(format!(
                "field \"{field}\" must hold a string, number or null, got {value}"
            ))
        })
    }

    /// Converts the id back into the JSON value it was read from.
    pub fn to_value(&self) -> Value {
        match self {
            NodeId::Null => Value::Null,
            NodeId::Int(i) => Value::Number((*i).into()),
            NodeId::UInt(u) => Value::Number((*u).into()),
            NodeId::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            NodeId::Str(s) => Value::String(s.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, NodeId::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            NodeId::Str(s) => Some(s),
            _ => None,
        }
    }

    fn float_bits(f: f64) -> u64 {
        // -0.0 and 0.0 name the same node.
        if f == 0.0 { 0.0f64.to_bits() } else { f.to_bits() }
    }
}

impl PartialEq for NodeId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NodeId::Null, NodeId::Null) => true,
            (NodeId::Int(a), NodeId::Int(b)) => a == b,
            (NodeId::UInt(a), NodeId::UInt(b)) => a == b,
            (NodeId::Float(a), NodeId::Float(b)) => Self::float_bits(*a) == Self::float_bits(*b),
            (NodeId::Str(a), NodeId::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for NodeId {}

impl Hash for NodeId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            NodeId::Null => {}
            NodeId::Int(i) => i.hash(state),
            NodeId::UInt(u) => u.hash(state),
            NodeId::Float(f) => Self::float_bits(*f).hash(state),
            NodeId::Str(s) => s.hash(state),
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::Int(0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Null => Ok(()),
            NodeId::Int(i) => write!(f, "{i}"),
            NodeId::UInt(u) => write!(f, "{u}"),
            NodeId::Float(x) => write!(f, "{x}"),
            NodeId::Str(s) => f.write_str(s),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::Str(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId::Str(value)
    }
}

impl From<&String> for NodeId {
    fn from(value: &String) -> Self {
        NodeId::Str(value.clone())
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        NodeId::Int(value)
    }
}

impl From<i32> for NodeId {
    fn from(value: i32) -> Self {
        NodeId::Int(value.into())
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        NodeId::Int(value.into())
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(i) => NodeId::Int(i),
            Err(_) => NodeId::UInt(value),
        }
    }
}

impl From<f64> for NodeId {
    fn from(value: f64) -> Self {
        NodeId::Float(value)
    }
}

impl From<&NodeId> for NodeId {
    fn from(value: &NodeId) -> Self {
        value.clone()
    }
}

impl From<NodeId> for Value {
    fn from(value: NodeId) -> Self {
        value.to_value()
    }
}
