//! Core data types for `StrataDB`.

mod value;

pub use value::Value;
