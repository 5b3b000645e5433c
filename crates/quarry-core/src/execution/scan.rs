//! Table scan executor.

use std::sync::Arc;

use super::join_display;
use crate::meta::{ColumnMeta, TableInfo};
use crate::schema::Schema;
use crate::storage::HandleRange;
use crate::wire::{ScanTarget, WireExpr};

/// Reads rows of one table through the storage client.
#[derive(Debug, Clone, PartialEq)]
pub struct TableScanExec {
    /// Table being scanned.
    pub table: Arc<TableInfo>,
    /// Alias the query gave the table, if any.
    pub as_name: Option<String>,
    /// Columns read.
    pub columns: Vec<ColumnMeta>,
    /// Handle ranges to scan.
    pub ranges: Vec<HandleRange>,
    /// Whether storage can scan in descending order.
    pub desc_supported: bool,
    /// Filter evaluated by storage.
    pub pushed_filter: Option<WireExpr>,
    /// Start timestamp of the reading transaction.
    pub start_ts: u64,
    /// Output schema.
    pub schema: Schema,
}

/// Mutable access to a scan's storage-side filter.
pub struct PushdownSlot<'a> {
    /// Table and alias the filter's columns must belong to.
    pub target: ScanTarget<'a>,
    filter: &'a mut Option<WireExpr>,
}

impl PushdownSlot<'_> {
    /// Returns the filter already pushed, if any.
    #[must_use]
    pub fn existing(&self) -> Option<&WireExpr> {
        self.filter.as_ref()
    }

    /// Installs `filter`, which must already include the existing one.
    pub fn replace(self, filter: WireExpr) {
        *self.filter = Some(filter);
    }
}

impl TableScanExec {
    /// Returns the push-down slot of this scan.
    pub fn pushdown_slot(&mut self) -> PushdownSlot<'_> {
        PushdownSlot {
            target: ScanTarget::new(&self.table).with_alias(self.as_name.as_deref()),
            filter: &mut self.pushed_filter,
        }
    }

    pub(super) fn detail(&self) -> String {
        let mut out = format!("table:{}", self.table.qualified_name());
        if let Some(alias) = &self.as_name {
            out.push_str(&format!(" as {alias}"));
        }
        if !self.ranges.is_empty() {
            out.push_str(&format!(", range:{}", join_display(&self.ranges)));
        }
        if let Some(filter) = &self.pushed_filter {
            out.push_str(&format!(", pushed:{filter}"));
        }
        if self.desc_supported {
            out.push_str(", desc");
        }
        out
    }
}
