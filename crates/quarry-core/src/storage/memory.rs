//! In-memory storage client and transaction.
//!
//! These answer capability queries from a fixed set and record every query
//! they receive. They never serve rows.

use std::sync::Arc;

use hashbrown::HashSet;
use parking_lot::Mutex;
use tracing::trace;

use super::{RequestSubType, RequestType, StorageClient, Transaction};
use crate::wire::ExprType;

/// One recorded capability query and its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityQuery {
    /// Request kind asked about.
    pub req_type: RequestType,
    /// Refinement asked about.
    pub sub_type: RequestSubType,
    /// Answer given.
    pub supported: bool,
}

/// A storage client whose capabilities are configured up front.
///
/// # Example
///
/// ```
/// use quarry_core::storage::{MemoryClient, RequestSubType, RequestType, StorageClient};
/// use quarry_core::wire::ExprType;
///
/// let client = MemoryClient::new()
///     .with_request(RequestType::Select, RequestSubType::Basic)
///     .with_expr(ExprType::Eq);
/// assert!(client.supports_request_type(RequestType::Select, RequestSubType::Expr(ExprType::Eq)));
/// assert!(!client.supports_request_type(RequestType::Select, RequestSubType::Desc));
/// ```
#[derive(Debug, Default)]
pub struct MemoryClient {
    supported: HashSet<(RequestType, RequestSubType)>,
    queries: Mutex<Vec<CapabilityQuery>>,
}

impl MemoryClient {
    /// Creates a client that supports nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a client that supports plain and descending selects and every expression type.
    #[must_use]
    pub fn full() -> Self {
        Self::new()
            .with_request(RequestType::Select, RequestSubType::Basic)
            .with_request(RequestType::Select, RequestSubType::Desc)
            .with_all_exprs()
    }

    /// Adds support for a request kind.
    #[must_use]
    pub fn with_request(mut self, req_type: RequestType, sub_type: RequestSubType) -> Self {
        self.supported.insert((req_type, sub_type));
        self
    }

    /// Adds support for evaluating one expression type in select requests.
    #[must_use]
    pub fn with_expr(self, tp: ExprType) -> Self {
        self.with_request(RequestType::Select, RequestSubType::Expr(tp))
    }

    /// Adds support for every expression type in select requests.
    #[must_use]
    pub fn with_all_exprs(self) -> Self {
        ExprType::ALL
            .iter()
            .fold(self, |client, &tp| client.with_expr(tp))
    }

    /// Returns the queries received so far, oldest first.
    #[must_use]
    pub fn queries(&self) -> Vec<CapabilityQuery> {
        self.queries.lock().clone()
    }

    /// Forgets recorded queries.
    pub fn clear_queries(&self) {
        self.queries.lock().clear();
    }
}

impl StorageClient for MemoryClient {
    fn supports_request_type(&self, req_type: RequestType, sub_type: RequestSubType) -> bool {
        let supported = self.supported.contains(&(req_type, sub_type));
        trace!(?req_type, %sub_type, supported, "capability query");
        self.queries.lock().push(CapabilityQuery {
            req_type,
            sub_type,
            supported,
        });
        supported
    }
}

/// A transaction that only hands out its storage client.
pub struct MemoryTransaction {
    start_ts: u64,
    client: Arc<dyn StorageClient>,
}

impl MemoryTransaction {
    /// Creates a transaction over `client`.
    pub fn new(start_ts: u64, client: Arc<dyn StorageClient>) -> Self {
        Self { start_ts, client }
    }
}

impl Transaction for MemoryTransaction {
    fn start_ts(&self) -> u64 {
        self.start_ts
    }

    fn client(&self) -> Arc<dyn StorageClient> {
        Arc::clone(&self.client)
    }
}
