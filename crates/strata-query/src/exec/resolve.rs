//! Name resolution for return expressions.
//!
//! Return expressions are compiled against three read-only inputs: the
//! layout of the records the child yields (variables), the schema catalog
//! (property keys) and the function registry.

use std::collections::HashSet;

use crate::error::{BuildError, BuildResult};

use super::functions::FunctionRegistry;
use super::record::RecordLayout;

/// Property keys known to the graph.
///
/// An open catalog accepts any property key; a closed one rejects keys it
/// has not seen, so typos fail when the plan is built.
#[derive(Debug, Clone, Default)]
pub struct SchemaCatalog {
    /// Known property keys, or `None` when the catalog is open.
    property_keys: Option<HashSet<String>>,
}

impl SchemaCatalog {
    /// Creates an open catalog.
    #[must_use]
    pub fn open() -> Self {
        Self::default()
    }

    /// Creates a closed catalog over the given property keys.
    #[must_use]
    pub fn closed<S: Into<String>>(keys: impl IntoIterator<Item = S>) -> Self {
        Self { property_keys: Some(keys.into_iter().map(Into::into).collect()) }
    }

    /// Returns true if the catalog accepts any property key.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.property_keys.is_none()
    }

    /// Returns true if `key` may be used as a property key.
    #[must_use]
    pub fn has_property_key(&self, key: &str) -> bool {
        self.property_keys.as_ref().map_or(true, |keys| keys.contains(key))
    }

    /// Checks a property key.
    pub fn check_property_key(&self, key: &str) -> BuildResult<()> {
        if self.has_property_key(key) {
            Ok(())
        } else {
            Err(BuildError::UnknownProperty(key.to_string()))
        }
    }
}

/// The graph-level inputs to plan construction.
///
/// Owned by whoever builds plans and shared by every operator built
/// against the same graph.
#[derive(Debug, Clone, Default)]
pub struct SchemaContext {
    /// Known property keys.
    pub catalog: SchemaCatalog,
    /// Scalar functions.
    pub functions: FunctionRegistry,
}

impl SchemaContext {
    /// Creates a context from its parts.
    #[must_use]
    pub fn new(catalog: SchemaCatalog, functions: FunctionRegistry) -> Self {
        Self { catalog, functions }
    }

    /// Creates a resolution context for records with the given layout.
    #[must_use]
    pub fn resolver<'a>(&'a self, layout: &'a RecordLayout) -> ResolutionContext<'a> {
        ResolutionContext { layout, catalog: &self.catalog, functions: &self.functions }
    }
}

/// Everything needed to compile one expression.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    /// The layout of the records the expression is evaluated against.
    pub layout: &'a RecordLayout,
    /// Known property keys.
    pub catalog: &'a SchemaCatalog,
    /// Scalar functions.
    pub functions: &'a FunctionRegistry,
}

impl ResolutionContext<'_> {
    /// Resolves a variable to its record slot.
    pub fn resolve_variable(&self, name: &str) -> BuildResult<usize> {
        self.layout.index_of(name).ok_or_else(|| BuildError::UnknownVariable(name.to_string()))
    }
}
