//! Query abstract syntax tree.
//!
//! Only the parts of the tree consumed by the execution layer live here:
//!
//! - [`expr`] - Expressions (literals, variables, properties, operators, calls)
//! - [`clause`] - The RETURN clause and its items

pub mod clause;
pub mod expr;

pub use clause::{ReturnClause, ReturnItem};
pub use expr::{BinaryOp, Expr, Literal, UnaryOp};
