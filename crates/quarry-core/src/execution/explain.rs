//! Flattened, printable view of an executor tree.

use serde::Serialize;

use super::Executor;

/// One executor in pre-order, with its nesting depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplainRow {
    /// Nesting depth; the root is 0.
    pub depth: usize,
    /// Executor name.
    pub name: &'static str,
    /// Executor-specific fields.
    pub detail: String,
    /// Output schema.
    pub schema: String,
}

impl Executor {
    /// Flattens the tree in pre-order.
    #[must_use]
    pub fn explain(&self) -> Vec<ExplainRow> {
        let mut rows = Vec::new();
        self.explain_into(0, &mut rows);
        rows
    }

    fn explain_into(&self, depth: usize, rows: &mut Vec<ExplainRow>) {
        rows.push(ExplainRow {
            depth,
            name: self.name(),
            detail: self.detail(),
            schema: self.schema().to_string(),
        });
        for child in self.children() {
            child.explain_into(depth + 1, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::execution::{ExistsExec, SelectionExec, TableScanExec};
    use crate::expression::Expression;
    use crate::meta::TableInfo;
    use crate::schema::{ColumnInfo, Schema};
    use quarry_common::types::{LogicalType, TableId};

    #[test]
    fn test_explain_preorder() {
        let table = TableInfo::new(TableId::new(3), "db", "t").with_column("a", LogicalType::Int64);
        let schema = Schema::new(vec![ColumnInfo::new("a", LogicalType::Int64)]);
        let scan = Executor::TableScan(TableScanExec {
            columns: table.columns.clone(),
            table: Arc::new(table),
            as_name: None,
            ranges: Vec::new(),
            desc_supported: true,
            pushed_filter: None,
            start_ts: 0,
            schema: schema.clone(),
        });
        let selection = Executor::Selection(SelectionExec::new(
            scan,
            Expression::constant(true),
            schema,
        ));
        let root = Executor::Exists(ExistsExec {
            child: Box::new(selection),
            schema: Schema::new(vec![ColumnInfo::new("exists", LogicalType::Bool)]),
        });

        let rows = root.explain();
        let names: Vec<_> = rows.iter().map(|r| (r.depth, r.name)).collect();
        assert_eq!(names, vec![(0, "Exists"), (1, "Selection"), (2, "TableScan")]);
        assert_eq!(rows[1].detail, "true");
        assert_eq!(rows[2].detail, "table:db.t, desc");
        assert_eq!(root.node_count(), 3);
    }
}
