//! # quarry-core
//!
//! Core layer for Quarry: expressions, executor trees, the storage capability
//! interface, and the wire format used for predicate push-down.
//!
//! This crate depends only on `quarry-common`.
//!
//! ## Modules
//!
//! - [`expression`] - Scalar expressions and the balanced condition composer
//! - [`schema`] - Output schemas of plans and executors
//! - [`meta`] - Table metadata as seen by the catalog
//! - [`storage`] - Storage client capability interface and in-memory stand-ins
//! - [`wire`] - Wire-format expressions and the expression-to-wire compiler
//! - [`execution`] - The executor tree produced by the plan compiler

pub mod execution;
pub mod expression;
pub mod meta;
pub mod schema;
pub mod storage;
pub mod wire;

// Re-export commonly used types
pub use execution::Executor;
pub use expression::{ColumnRef, Expression, FuncKind, ScalarFunction};
pub use meta::{ColumnMeta, TableInfo};
pub use schema::{ColumnInfo, Schema};
pub use storage::{RequestSubType, RequestType, StorageClient, Transaction};
pub use wire::{ExprType, WireExpr};
