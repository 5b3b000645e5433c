//! Aggregation executor.

use super::{Executor, join_display};
use crate::expression::{AggregateExpr, Expression};
use crate::schema::Schema;

/// Groups input rows and evaluates aggregate functions per group.
///
/// An empty `group_by` means a single global group.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationExec {
    /// Input executor.
    pub child: Box<Executor>,
    /// Aggregate functions.
    pub agg_funcs: Vec<AggregateExpr>,
    /// Group-by expressions.
    pub group_by: Vec<Expression>,
    /// Output schema.
    pub schema: Schema,
}

impl AggregationExec {
    pub(super) fn detail(&self) -> String {
        if self.group_by.is_empty() {
            format!("funcs:{}", join_display(&self.agg_funcs))
        } else {
            format!(
                "funcs:{}, group by:{}",
                join_display(&self.agg_funcs),
                join_display(&self.group_by)
            )
        }
    }
}
