//! The executor tree.
//!
//! Executors are produced by the plan compiler, one per compiled plan node
//! (a selection whose conditions are all pushed down produces none). This
//! crate only describes their shape: the row-iteration runtime lives
//! elsewhere.
//!
//! - Scan: read rows from storage, optionally with a pushed-down filter
//! - Selection: evaluate a residual predicate locally
//! - Projection, Aggregation, Sort: the usual relational wrappers
//! - HashJoin: build a hash table from the small side, look up rows from the big side
//! - Apply, Exists, MaxOneRow: correlated subquery support

mod aggregate;
mod apply;
mod explain;
mod join;
mod projection;
mod scan;
mod selection;
mod sort;

pub use aggregate::AggregationExec;
pub use apply::{ApplyExec, ExistsExec, MaxOneRowExec};
pub use explain::ExplainRow;
pub use join::{HashJoinExec, HashKey};
pub use projection::ProjectionExec;
pub use scan::{PushdownSlot, TableScanExec};
pub use selection::SelectionExec;
pub use sort::SortExec;

use crate::schema::Schema;

/// A compiled executor.
#[derive(Debug, Clone, PartialEq)]
pub enum Executor {
    /// Table scan.
    TableScan(TableScanExec),
    /// Local predicate evaluation.
    Selection(SelectionExec),
    /// Column projection.
    Projection(ProjectionExec),
    /// Grouped aggregation.
    Aggregation(AggregationExec),
    /// Sort.
    Sort(SortExec),
    /// Hash join.
    HashJoin(HashJoinExec),
    /// Correlated apply.
    Apply(ApplyExec),
    /// Existence check.
    Exists(ExistsExec),
    /// At-most-one-row guard.
    MaxOneRow(MaxOneRowExec),
}

impl Executor {
    /// Returns the output schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        match self {
            Self::TableScan(e) => &e.schema,
            Self::Selection(e) => &e.schema,
            Self::Projection(e) => &e.schema,
            Self::Aggregation(e) => &e.schema,
            Self::Sort(e) => &e.schema,
            Self::HashJoin(e) => &e.schema,
            Self::Apply(e) => &e.schema,
            Self::Exists(e) => &e.schema,
            Self::MaxOneRow(e) => &e.schema,
        }
    }

    /// Returns the name of this executor for debugging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::TableScan(_) => "TableScan",
            Self::Selection(_) => "Selection",
            Self::Projection(_) => "Projection",
            Self::Aggregation(_) => "Aggregation",
            Self::Sort(_) => "Sort",
            Self::HashJoin(_) => "HashJoin",
            Self::Apply(_) => "Apply",
            Self::Exists(_) => "Exists",
            Self::MaxOneRow(_) => "MaxOneRow",
        }
    }

    /// Returns the child executors, in execution order.
    ///
    /// For a hash join that is the small (build) side first.
    #[must_use]
    pub fn children(&self) -> Vec<&Executor> {
        match self {
            Self::TableScan(_) => Vec::new(),
            Self::Selection(e) => vec![e.child.as_ref()],
            Self::Projection(e) => vec![e.child.as_ref()],
            Self::Aggregation(e) => vec![e.child.as_ref()],
            Self::Sort(e) => vec![e.child.as_ref()],
            Self::HashJoin(e) => vec![e.small_exec.as_ref(), e.big_exec.as_ref()],
            Self::Apply(e) => vec![e.child.as_ref(), e.inner.as_ref()],
            Self::Exists(e) => vec![e.child.as_ref()],
            Self::MaxOneRow(e) => vec![e.child.as_ref()],
        }
    }

    /// Returns the push-down slot if this executor can accept a storage-side filter.
    ///
    /// Only table scans have one.
    pub fn pushdown_slot(&mut self) -> Option<PushdownSlot<'_>> {
        match self {
            Self::TableScan(scan) => Some(scan.pushdown_slot()),
            Self::Selection(_)
            | Self::Projection(_)
            | Self::Aggregation(_)
            | Self::Sort(_)
            | Self::HashJoin(_)
            | Self::Apply(_)
            | Self::Exists(_)
            | Self::MaxOneRow(_) => None,
        }
    }

    /// Returns a one-line description of this executor's own fields.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::TableScan(e) => e.detail(),
            Self::Selection(e) => e.detail(),
            Self::Projection(e) => e.detail(),
            Self::Aggregation(e) => e.detail(),
            Self::Sort(e) => e.detail(),
            Self::HashJoin(e) => e.detail(),
            Self::Apply(e) => e.detail(),
            Self::Exists(_) | Self::MaxOneRow(_) => String::new(),
        }
    }

    /// Returns the number of executors in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Executor::node_count)
            .sum::<usize>()
    }
}

/// Joins displayable items with `", "`.
pub(crate) fn join_display<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
