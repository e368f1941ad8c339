//! Scalar function registry.
//!
//! Function names are resolved once, when a return expression is compiled.
//! Lookups are case-insensitive, so `toUpper`, `TOUPPER` and `toupper` all
//! name the same function.

use std::collections::HashMap;
use std::fmt;

use strata_core::Value;

use crate::error::{BuildError, BuildResult};

/// Signature of a scalar function body.
///
/// Functions are total: bad argument types yield [`Value::Null`].
pub type ScalarFn = fn(&[Value]) -> Value;

/// How many arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many.
    Exact(usize),
    /// This many or more.
    AtLeast(usize),
}

impl Arity {
    /// Returns true if `count` arguments are acceptable.
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(n) => count == n,
            Self::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// A registered scalar function.
#[derive(Clone, Copy)]
pub struct FunctionDef {
    /// Canonical name, as registered.
    pub name: &'static str,
    /// Accepted argument count.
    pub arity: Arity,
    /// The function body.
    pub func: ScalarFn,
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef").field("name", &self.name).field("arity", &self.arity).finish()
    }
}

/// Registry of scalar functions callable from return expressions.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    /// Creates a registry with no functions.
    #[must_use]
    pub fn empty() -> Self {
        Self { functions: HashMap::new() }
    }

    /// Creates a registry holding the built-in functions.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("toUpper", Arity::Exact(1), to_upper);
        registry.register("toLower", Arity::Exact(1), to_lower);
        registry.register("size", Arity::Exact(1), size);
        registry.register("abs", Arity::Exact(1), abs);
        registry.register("coalesce", Arity::AtLeast(1), coalesce);
        registry.register("id", Arity::Exact(1), id);
        registry.register("labels", Arity::Exact(1), labels);
        registry.register("type", Arity::Exact(1), edge_type);
        registry.register("toString", Arity::Exact(1), to_string);
        registry.register("keys", Arity::Exact(1), keys);
        registry
    }

    /// Registers a function, replacing any function with the same name.
    pub fn register(&mut self, name: &'static str, arity: Arity, func: ScalarFn) {
        self.functions.insert(name.to_lowercase(), FunctionDef { name, arity, func });
    }

    /// Looks up a function by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(&name.to_lowercase())
    }

    /// Resolves a call site, checking that the function exists and accepts
    /// `arg_count` arguments.
    pub fn resolve(&self, name: &str, arg_count: usize) -> BuildResult<FunctionDef> {
        let def = self.get(name).ok_or_else(|| BuildError::UnknownFunction(name.to_string()))?;
        if !def.arity.accepts(arg_count) {
            return Err(BuildError::Arity {
                function: name.to_string(),
                expected: def.arity.to_string(),
                found: arg_count,
            });
        }
        Ok(*def)
    }

    /// Returns the number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns true if no functions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

// ========== Built-ins ==========

fn to_upper(args: &[Value]) -> Value {
    match args.first() {
        Some(Value::String(s)) => Value::String(s.to_uppercase()),
        _ => Value::Null,
    }
}

fn to_lower(args: &[Value]) -> Value {
    match args.first() {
        Some(Value::String(s)) => Value::String(s.to_lowercase()),
        _ => Value::Null,
    }
}

fn size(args: &[Value]) -> Value {
    let len = match args.first() {
        Some(Value::String(s)) => s.chars().count(),
        Some(Value::Array(items)) => items.len(),
        _ => return Value::Null,
    };
    i64::try_from(len).map_or(Value::Null, Value::Int)
}

fn abs(args: &[Value]) -> Value {
    match args.first() {
        Some(Value::Int(i)) => i.checked_abs().map_or(Value::Null, Value::Int),
        Some(Value::Float(f)) => Value::Float(f.abs()),
        _ => Value::Null,
    }
}

fn coalesce(args: &[Value]) -> Value {
    args.iter().find(|v| !v.is_null()).cloned().unwrap_or(Value::Null)
}

fn id(args: &[Value]) -> Value {
    match args.first() {
        Some(Value::Node { id, .. } | Value::Edge { id, .. }) => Value::Int(*id),
        _ => Value::Null,
    }
}

fn labels(args: &[Value]) -> Value {
    match args.first() {
        Some(Value::Node { labels, .. }) => {
            Value::Array(labels.iter().cloned().map(Value::String).collect())
        }
        _ => Value::Null,
    }
}

fn edge_type(args: &[Value]) -> Value {
    match args.first() {
        Some(Value::Edge { edge_type, .. }) => Value::String(edge_type.clone()),
        _ => Value::Null,
    }
}

fn to_string(args: &[Value]) -> Value {
    match args.first() {
        None | Some(Value::Null) => Value::Null,
        Some(Value::String(s)) => Value::String(s.clone()),
        Some(v @ (Value::Bool(_) | Value::Int(_) | Value::Float(_))) => {
            Value::String(v.to_string())
        }
        Some(_) => Value::Null,
    }
}

fn keys(args: &[Value]) -> Value {
    match args.first() {
        Some(Value::Node { properties, .. } | Value::Edge { properties, .. }) => {
            let mut keys: Vec<&String> = properties.keys().collect();
            keys.sort();
            Value::Array(keys.into_iter().cloned().map(Value::String).collect())
        }
        _ => Value::Null,
    }
}
