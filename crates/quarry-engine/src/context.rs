//! Per-compilation context.

use std::sync::Arc;

use quarry_common::utils::error::{Result, TransactionError};
use quarry_core::storage::{StorageClient, Transaction};

use crate::catalog::Catalog;
use crate::config::Config;

/// Everything the compiler reads from its session.
///
/// The transaction is optional: plans without scans or push-downs compile
/// without one.
#[derive(Clone)]
pub struct CompileContext {
    txn: Option<Arc<dyn Transaction>>,
    catalog: Arc<dyn Catalog>,
    config: Config,
}

impl CompileContext {
    /// Creates a context with no transaction and default config.
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            txn: None,
            catalog,
            config: Config::default(),
        }
    }

    /// Sets the active transaction.
    #[must_use]
    pub fn with_transaction(mut self, txn: Arc<dyn Transaction>) -> Self {
        self.txn = Some(txn);
        self
    }

    /// Sets the config.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Returns the active transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotStarted` if there is none.
    pub fn txn(&self) -> Result<&Arc<dyn Transaction>> {
        self.txn
            .as_ref()
            .ok_or_else(|| TransactionError::NotStarted.into())
    }

    /// Returns the storage client of the active transaction.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::NotStarted` if there is no transaction.
    pub fn client(&self) -> Result<Arc<dyn StorageClient>> {
        Ok(self.txn()?.client())
    }

    /// Returns the catalog.
    #[must_use]
    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    /// Returns the config.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for CompileContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompileContext")
            .field("txn_start_ts", &self.txn.as_ref().map(|t| t.start_ts()))
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use quarry_common::Error;
    use quarry_core::storage::{MemoryClient, MemoryTransaction};

    #[test]
    fn test_missing_transaction() {
        let ctx = CompileContext::new(Arc::new(MemoryCatalog::new()));
        assert!(matches!(
            ctx.client(),
            Err(Error::Transaction(TransactionError::NotStarted))
        ));
    }

    #[test]
    fn test_with_transaction() {
        let txn = MemoryTransaction::new(7, Arc::new(MemoryClient::full()));
        let ctx = CompileContext::new(Arc::new(MemoryCatalog::new()))
            .with_transaction(Arc::new(txn))
            .with_config(Config::default().with_pushdown(false));
        assert_eq!(ctx.txn().unwrap().start_ts(), 7);
        assert!(ctx.client().is_ok());
        assert!(!ctx.config().enable_pushdown);
    }
}
