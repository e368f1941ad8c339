//! Error types for plan construction and query execution.

use thiserror::Error;

/// Errors raised while compiling return-clause expressions.
///
/// These only ever surface when a plan is built; a successfully built
/// operator never reports them from `consume`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The return clause has no items.
    #[error("return clause must project at least one expression")]
    EmptyReturn,

    /// A variable is not bound by the input records.
    #[error("variable `{0}` is not defined")]
    UnknownVariable(String),

    /// A function name is not registered.
    #[error("unknown function `{0}`")]
    UnknownFunction(String),

    /// A function was called with the wrong number of arguments.
    #[error("function `{function}` expects {expected} argument(s), got {found}")]
    Arity {
        /// The function name as written.
        function: String,
        /// Human readable expected arity (e.g. `1` or `at least 1`).
        expected: String,
        /// Number of arguments supplied.
        found: usize,
    },

    /// A property key is not known to a closed schema catalog.
    #[error("unknown property key `{0}`")]
    UnknownProperty(String),

    /// Two return items resolve to the same column name.
    #[error("multiple result columns with the same name `{0}`")]
    DuplicateColumn(String),
}

/// Result type for plan construction.
pub type BuildResult<T> = Result<T, BuildError>;

/// Errors raised while pulling records through an operator tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperatorError {
    /// The result sink failed for a reason other than reaching capacity.
    #[error("result sink error: {0}")]
    Sink(String),

    /// A leaf operator failed to read its input.
    #[error("source error: {0}")]
    Source(String),

    /// `consume` was called on an operator that already failed.
    #[error("operator `{0}` already failed and must be reset")]
    Errored(&'static str),

    /// `consume` or `reset` was called on a released operator.
    #[error("operator `{0}` has been released")]
    Released(&'static str),
}

/// Result type for operator operations.
pub type OperatorResult<T> = Result<T, OperatorError>;
