//! `StrataDB` Query
//!
//! This crate provides the execution side of `StrataDB` read queries: the
//! pull-based operator tree, RETURN expression compilation, and the result
//! sink that collects finished rows.
//!
//! # Overview
//!
//! - **AST**: The RETURN clause and its expressions
//! - **Exec**: Operators, the executor that drives them, and result sets
//!
//! # Modules
//!
//! - [`ast`] - RETURN clause and expression types
//! - [`exec`] - Query execution
//! - [`error`] - Error types for plan construction and execution
//!
//! # Quick Start
//!
//! ```
//! use std::collections::HashMap;
//!
//! use strata_core::Value;
//! use strata_query::ast::{Expr, ReturnClause};
//! use strata_query::exec::{ExecutionConfig, Executor, ProduceResultsOp, SchemaContext, ValuesOp};
//!
//! let mut props = HashMap::new();
//! props.insert("name".to_string(), Value::from("Al"));
//! let matched = ValuesOp::with_variables(["a"], vec![vec![Value::node(1, vec![], props)]]);
//!
//! // MATCH (a) RETURN a.name
//! let clause = ReturnClause::exprs([Expr::variable("a").property("name")]);
//! let root = ProduceResultsOp::new(&clause, &SchemaContext::default(), Some(Box::new(matched)))?;
//!
//! let config = ExecutionConfig::new().with_max_result_rows(100);
//! let result = Executor::with_config(Box::new(root), config).execute()?;
//! assert_eq!(result.columns(), vec!["a.name"]);
//! assert_eq!(result.to_values(), vec![vec![Value::from("Al")]]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod ast;
pub mod error;
pub mod exec;

// Re-export commonly used items at the crate root
pub use error::{BuildError, BuildResult, OperatorError, OperatorResult};
pub use exec::{Executor, Operator, OutputRow, ProduceResultsOp, ResultSet, ResultSink};
