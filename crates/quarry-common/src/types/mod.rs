//! Core type definitions for Quarry.
//!
//! - Identifier types ([`TableId`], [`ColumnId`])
//! - Scalar types ([`Value`], [`LogicalType`])

mod id;
mod logical_type;
mod value;

pub use id::{ColumnId, TableId};
pub use logical_type::LogicalType;
pub use value::Value;
