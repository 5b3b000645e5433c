//! Projection executor.

use super::{Executor, join_display};
use crate::expression::Expression;
use crate::schema::Schema;

/// Computes one output column per expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionExec {
    /// Input executor.
    pub child: Box<Executor>,
    /// Projected expressions, one per output column.
    pub exprs: Vec<Expression>,
    /// Output schema.
    pub schema: Schema,
}

impl ProjectionExec {
    /// Creates a projection over `child`.
    pub fn new(child: Executor, exprs: Vec<Expression>, schema: Schema) -> Self {
        Self {
            child: Box::new(child),
            exprs,
            schema,
        }
    }

    pub(super) fn detail(&self) -> String {
        join_display(&self.exprs)
    }
}
