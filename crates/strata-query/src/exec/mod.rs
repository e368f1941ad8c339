//! Query execution engine.
//!
//! This module provides the operator tree and the executor that drives it.
//!
//! # Architecture
//!
//! The execution engine uses a **pull-based model**: each operator
//! implements the [`Operator`] trait, and every call to
//! [`Operator::consume`] asks for one more record. Records flow from the
//! leaves to the root; the root, [`ProduceResultsOp`], turns each record
//! into a result row and appends it to a caller-owned [`ResultSink`].
//!
//! # Modules
//!
//! - [`operators`] - Concrete operator implementations
//!
//! Everything else is re-exported from this module:
//!
//! - Records and their layouts ([`Record`], [`RecordLayout`])
//! - The operator contract ([`Operator`], [`OpStatus`], [`OperatorState`])
//! - Expression compilation ([`ExprTree`], [`SchemaContext`],
//!   [`FunctionRegistry`])
//! - Results ([`ResultSink`], [`ResultSet`], [`OutputRow`])
//! - The driver ([`Executor`]) and its configuration
//!
//! # Example
//!
//! ```
//! use strata_core::Value;
//! use strata_query::ast::{Expr, ReturnClause};
//! use strata_query::exec::{Executor, ProduceResultsOp, SchemaContext, ValuesOp};
//!
//! let input = ValuesOp::with_variables(["n"], vec![vec![Value::Int(1)], vec![Value::Int(2)]]);
//! let clause = ReturnClause::exprs([Expr::variable("n").mul(Expr::integer(10))]);
//! let root = ProduceResultsOp::new(&clause, &SchemaContext::default(), Some(Box::new(input)))?;
//!
//! let result = Executor::new(Box::new(root)).execute()?;
//! assert_eq!(result.to_values(), vec![vec![Value::Int(10)], vec![Value::Int(20)]]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod context;
mod executor;
mod expression;
mod functions;
mod operator;
mod record;
mod resolve;
mod result;

pub mod operators;

// Re-exports
pub use crate::error::{OperatorError, OperatorResult};
pub use context::{ExecutionConfig, ExecutionStats, PullContext};
pub use executor::{DrainOutcome, Executor};
pub use expression::ExprTree;
pub use functions::{Arity, FunctionDef, FunctionRegistry, ScalarFn};
pub use operator::{release_tree, BoxedOperator, OpStatus, Operator, OperatorBase, OperatorState};
pub use operators::{ProduceResultsOp, ValuesOp};
pub use record::{Record, RecordLayout};
pub use resolve::{ResolutionContext, SchemaCatalog, SchemaContext};
pub use result::{OutputRow, ResultSet, ResultSink, SinkError};
