//! Output schemas.
//!
//! Every plan node and every executor carries a [`Schema`]; compiling a node
//! never changes it.

use std::fmt;

use quarry_common::types::LogicalType;
use serde::{Deserialize, Serialize};

/// One output column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Column type.
    pub ty: LogicalType,
    /// Table (or alias) the column originates from, if any.
    #[serde(default)]
    pub table: Option<String>,
}

impl ColumnInfo {
    /// Creates a column with no originating table.
    pub fn new(name: impl Into<String>, ty: LogicalType) -> Self {
        Self {
            name: name.into(),
            ty,
            table: None,
        }
    }

    /// Sets the originating table.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }
}

/// An ordered list of output columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    columns: Vec<ColumnInfo>,
}

impl Schema {
    /// Creates a schema from columns.
    #[must_use]
    pub fn new(columns: Vec<ColumnInfo>) -> Self {
        Self { columns }
    }

    /// Creates an empty schema.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the columns.
    #[must_use]
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns whether the schema has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the concatenation of `self` and `other`, as a join produces.
    #[must_use]
    pub fn merge(&self, other: &Schema) -> Schema {
        let mut columns = self.columns.clone();
        columns.extend(other.columns.iter().cloned());
        Schema { columns }
    }
}

impl FromIterator<ColumnInfo> for Schema {
    fn from_iter<I: IntoIterator<Item = ColumnInfo>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, col) in self.columns.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match &col.table {
                Some(t) => write!(f, "{t}.{}", col.name)?,
                None => f.write_str(&col.name)?,
            }
        }
        f.write_str("]")
    }
}
