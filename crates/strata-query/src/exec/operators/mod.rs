//! Concrete operator implementations.
//!
//! # Operators
//!
//! - [`produce_results`] - Terminal operator that fills the result sink
//! - [`values`] - Inline records

pub mod produce_results;
pub mod values;

pub use produce_results::ProduceResultsOp;
pub use values::ValuesOp;
