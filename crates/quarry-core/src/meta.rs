//! Table metadata, as the catalog describes it.

use quarry_common::types::{ColumnId, LogicalType, TableId};
use serde::{Deserialize, Serialize};

/// Metadata of one table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Storage-level column id.
    pub id: ColumnId,
    /// Column name.
    pub name: String,
    /// Column type.
    pub ty: LogicalType,
    /// Position of the column in the table's row layout.
    #[serde(default)]
    pub offset: usize,
}

/// Metadata of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    /// Table id.
    pub id: TableId,
    /// Table name.
    pub name: String,
    /// Name of the database (schema) holding the table.
    pub db_name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnMeta>,
}

impl TableInfo {
    /// Creates table metadata with no columns.
    pub fn new(id: TableId, db_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            db_name: db_name.into(),
            columns: Vec::new(),
        }
    }

    /// Appends a column; its id is its 1-based position and its offset its 0-based one.
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, ty: LogicalType) -> Self {
        let offset = self.columns.len();
        self.columns.push(ColumnMeta {
            id: ColumnId::new(offset as i64 + 1),
            name: name.into(),
            ty,
            offset,
        });
        self
    }

    /// Finds a column by name, case-insensitively.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Returns the fully qualified `db.table` name.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.db_name, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_info_columns() {
        let table = TableInfo::new(TableId::new(1), "test", "t")
            .with_column("id", LogicalType::Int64)
            .with_column("Name", LogicalType::String);

        let col = table.column("name").unwrap();
        assert_eq!(col.id, ColumnId::new(2));
        assert_eq!(col.offset, 1);
        assert!(table.column("missing").is_none());
        assert_eq!(table.qualified_name(), "test.t");
    }
}
