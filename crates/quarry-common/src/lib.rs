//! # quarry-common
//!
//! Foundation layer for Quarry: values, types, identifiers, and errors.
//!
//! Every other Quarry crate depends on this one. It has no internal
//! dependencies and should be kept minimal.
//!
//! ## Modules
//!
//! - [`types`] - Core type definitions (TableId, ColumnId, Value, LogicalType)
//! - [`utils`] - Utilities shared across crates (errors)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use types::{ColumnId, LogicalType, TableId, Value};
pub use utils::error::{Error, Result, TransactionError};
