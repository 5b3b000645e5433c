//! Table metadata lookup.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use quarry_common::types::TableId;
use quarry_core::meta::TableInfo;

/// Read access to table metadata.
pub trait Catalog: Send + Sync {
    /// Returns the table with this id.
    fn table_by_id(&self, id: TableId) -> Option<Arc<TableInfo>>;
}

/// A catalog held in memory, in registration order.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tables: RwLock<IndexMap<TableId, Arc<TableInfo>>>,
}

impl MemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table, replacing any table with the same id.
    pub fn register(&self, table: TableInfo) -> Arc<TableInfo> {
        let table = Arc::new(table);
        self.tables.write().insert(table.id, Arc::clone(&table));
        table
    }

    /// Returns every table, in registration order.
    #[must_use]
    pub fn tables(&self) -> Vec<Arc<TableInfo>> {
        self.tables.read().values().cloned().collect()
    }

    /// Returns the number of tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    /// Returns whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }
}

impl FromIterator<TableInfo> for MemoryCatalog {
    fn from_iter<I: IntoIterator<Item = TableInfo>>(iter: I) -> Self {
        let catalog = Self::new();
        for table in iter {
            catalog.register(table);
        }
        catalog
    }
}

impl Catalog for MemoryCatalog {
    fn table_by_id(&self, id: TableId) -> Option<Arc<TableInfo>> {
        self.tables.read().get(&id).cloned()
    }
}
