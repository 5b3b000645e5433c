//! # quarry-engine
//!
//! Compiles physical plan trees into executor trees.
//!
//! ## Modules
//!
//! - [`catalog`] - Table metadata lookup
//! - [`config`] - Compiler configuration
//! - [`context`] - Per-compilation context (transaction, catalog, config)
//! - [`query`] - Physical plans and the plan compiler

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod config;
pub mod context;
pub mod query;

pub use catalog::{Catalog, MemoryCatalog};
pub use config::Config;
pub use context::CompileContext;
pub use query::{JoinType, PlanCompiler, PlanNode, compose_condition};
