//! Sort executor.

use super::{Executor, join_display};
use crate::expression::ByItem;
use crate::schema::Schema;

/// Sorts its input by a list of keys.
#[derive(Debug, Clone, PartialEq)]
pub struct SortExec {
    /// Input executor.
    pub child: Box<Executor>,
    /// Sort keys, most significant first.
    pub by_items: Vec<ByItem>,
    /// Output schema.
    pub schema: Schema,
}

impl SortExec {
    pub(super) fn detail(&self) -> String {
        join_display(&self.by_items)
    }
}
