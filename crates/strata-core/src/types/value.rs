//! Values bound in records and produced by queries.
//!
//! This module provides the [`Value`] enum, which represents every value a
//! query can bind to a variable or project into a result row.
//!
//! # Example
//!
//! ```
//! use strata_core::Value;
//!
//! let name: Value = "Alice".into();
//! let age: Value = 30i64.into();
//! let score: Value = 95.5f64.into();
//! let active: Value = true.into();
//!
//! assert_eq!(name.as_str(), Some("Alice"));
//! assert_eq!(age.as_int(), Some(30));
//! assert_eq!(score.as_float(), Some(95.5));
//! assert_eq!(active.as_bool(), Some(true));
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A value bound in a record or stored in a result row.
///
/// # Supported Types
///
/// | Variant | Rust Type | Use Case |
/// |---------|-----------|----------|
/// | `Null` | - | Missing properties, null propagation |
/// | `Bool` | `bool` | Predicates |
/// | `Int` | `i64` | Integers, counters |
/// | `Float` | `f64` | Numeric measurements |
/// | `String` | `String` | Text data |
/// | `Array` | `Vec<Value>` | Lists |
/// | `Node` | id, labels, properties | Matched graph nodes |
/// | `Edge` | id, type, endpoints, properties | Matched relationships |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Null/missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// List of values
    Array(Vec<Value>),
    /// A graph node with its labels and properties.
    ///
    /// Bound when a pattern variable matches a node, e.g. `a` in
    /// `MATCH (a:Person) RETURN a.name`.
    Node {
        /// The unique node ID
        id: i64,
        /// Node labels
        labels: Vec<String>,
        /// Node properties
        properties: HashMap<String, Value>,
    },
    /// A graph relationship with its type, endpoints and properties.
    Edge {
        /// The unique edge ID
        id: i64,
        /// The relationship type
        edge_type: String,
        /// Source node ID
        source: i64,
        /// Target node ID
        target: i64,
        /// Edge properties
        properties: HashMap<String, Value>,
    },
}

impl Value {
    /// Returns `true` if the value is null.
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the value as a boolean if it is one.
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value as an integer if it is one.
    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float if it is one.
    #[inline]
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the value as a string slice if it is one.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a list slice if it is one.
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns `true` if the value is a graph node.
    #[inline]
    #[must_use]
    pub const fn is_node(&self) -> bool {
        matches!(self, Self::Node { .. })
    }

    /// Returns the value as a node reference if it is one.
    ///
    /// Returns a tuple of (id, labels, properties).
    #[inline]
    #[must_use]
    pub fn as_node(&self) -> Option<(i64, &[String], &HashMap<String, Value>)> {
        match self {
            Self::Node { id, labels, properties } => Some((*id, labels, properties)),
            _ => None,
        }
    }

    /// Returns `true` if the value is a graph edge.
    #[inline]
    #[must_use]
    pub const fn is_edge(&self) -> bool {
        matches!(self, Self::Edge { .. })
    }

    /// Returns the value as an edge reference if it is one.
    ///
    /// Returns a tuple of (id, edge_type, source, target, properties).
    #[inline]
    #[must_use]
    pub fn as_edge(&self) -> Option<(i64, &str, i64, i64, &HashMap<String, Value>)> {
        match self {
            Self::Edge { id, edge_type, source, target, properties } => {
                Some((*id, edge_type, *source, *target, properties))
            }
            _ => None,
        }
    }

    /// Looks up a property on a node or edge.
    ///
    /// Returns `None` for missing keys and for values that carry no
    /// properties.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Node { properties, .. } | Self::Edge { properties, .. } => properties.get(key),
            _ => None,
        }
    }

    /// Creates a node value from its components.
    #[must_use]
    pub fn node(id: i64, labels: Vec<String>, properties: HashMap<String, Value>) -> Self {
        Self::Node { id, labels, properties }
    }

    /// Creates an edge value from its components.
    #[must_use]
    pub fn edge(
        id: i64,
        edge_type: String,
        source: i64,
        target: i64,
        properties: HashMap<String, Value>,
    ) -> Self {
        Self::Edge { id, edge_type, source, target, properties }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(fl) => write!(f, "{fl}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Node { id, labels, .. } => {
                write!(f, "({id}")?;
                for label in labels {
                    write!(f, ":{label}")?;
                }
                write!(f, ")")
            }
            Self::Edge { id, edge_type, source, target, .. } => {
                write!(f, "({source})-[{id}:{edge_type}]->({target})")
            }
        }
    }
}

impl From<bool> for Value {
    #[inline]
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    #[inline]
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    #[inline]
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for Value {
    #[inline]
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}
