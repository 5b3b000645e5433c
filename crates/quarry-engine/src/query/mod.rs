//! Physical plans and their compilation into executors.
//!
//! - **Plan**: the physical plan tree the optimizer produces
//! - **Compiler**: recursive plan-to-executor translation, including join
//!   strategy selection and predicate push-down negotiation

pub mod compiler;
pub mod plan;

pub use compiler::{JoinStrategy, PlanCompiler, Pushdown, PushdownTranslator, compose_condition};
pub use plan::{JoinType, PlanNode};
