//! Subquery support executors.

use super::Executor;
use crate::schema::Schema;

/// Re-evaluates `inner` once per row of `child`, with the outer row bound.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyExec {
    /// Outer input.
    pub child: Box<Executor>,
    /// Correlated inner executor.
    pub inner: Box<Executor>,
    /// Columns of the outer row visible to `inner`.
    pub outer_schema: Schema,
    /// Output schema.
    pub schema: Schema,
}

impl ApplyExec {
    pub(super) fn detail(&self) -> String {
        format!("outer:{}", self.outer_schema)
    }
}

/// Produces a single boolean row: whether its input yields any row.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistsExec {
    /// Input executor.
    pub child: Box<Executor>,
    /// Output schema.
    pub schema: Schema,
}

/// Passes through at most one row and errors at runtime on a second one.
#[derive(Debug, Clone, PartialEq)]
pub struct MaxOneRowExec {
    /// Input executor.
    pub child: Box<Executor>,
    /// Output schema.
    pub schema: Schema,
}
