//! `StrataDB` Core
//!
//! This crate provides the value model shared by every layer of `StrataDB`.
//!
//! # Overview
//!
//! - **Values**: [`Value`] enum covering scalars, lists, and graph elements
//!   (nodes and relationships with their property maps)
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use strata_core::Value;
//!
//! let mut props = HashMap::new();
//! props.insert("name".to_string(), Value::from("Alice"));
//! props.insert("age".to_string(), Value::from(30i64));
//!
//! let alice = Value::node(1, vec!["Person".to_string()], props);
//!
//! assert!(alice.is_node());
//! assert_eq!(alice.property("name"), Some(&Value::from("Alice")));
//! assert_eq!(alice.property("missing"), None);
//! ```
//!
//! # Modules
//!
//! - [`types`] - Core data types ([`Value`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod types;

pub use types::Value;
