//! Local selection executor.

use super::Executor;
use crate::expression::Expression;
use crate::schema::Schema;

/// Evaluates the conditions storage could not take.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionExec {
    /// Input executor.
    pub child: Box<Executor>,
    /// Balanced conjunction of the residual conditions.
    pub condition: Expression,
    /// Output schema.
    pub schema: Schema,
}

impl SelectionExec {
    /// Creates a selection over `child`.
    pub fn new(child: Executor, condition: Expression, schema: Schema) -> Self {
        Self {
            child: Box::new(child),
            condition,
            schema,
        }
    }

    pub(super) fn detail(&self) -> String {
        self.condition.to_string()
    }
}
