//! Storage capability interface.
//!
//! The compiler never talks to storage directly. It only asks the client
//! which request kinds the coprocessor layer accepts, and shapes the scan
//! executors accordingly.
//!
//! - [`StorageClient`] - capability queries
//! - [`Transaction`] - the active transaction, which hands out the client
//! - [`memory`] - in-memory stand-ins used by tests and the CLI

pub mod memory;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::wire::ExprType;

pub use memory::{CapabilityQuery, MemoryClient, MemoryTransaction};

/// Top-level request kind sent to the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestType {
    /// Table (row) select request.
    Select,
}

/// Request refinement within a [`RequestType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestSubType {
    /// Plain request with no refinement.
    Basic,
    /// Descending scan order.
    Desc,
    /// Evaluation of one wire expression node type.
    Expr(ExprType),
}

impl fmt::Display for RequestSubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => f.write_str("basic"),
            Self::Desc => f.write_str("desc"),
            Self::Expr(tp) => write!(f, "expr:{}", tp.name()),
        }
    }
}

/// A storage client able to answer capability queries.
pub trait StorageClient: Send + Sync {
    /// Returns whether the storage layer accepts this request kind.
    fn supports_request_type(&self, req_type: RequestType, sub_type: RequestSubType) -> bool;
}

/// An active transaction.
pub trait Transaction: Send + Sync {
    /// Start timestamp of the transaction.
    fn start_ts(&self) -> u64;

    /// Storage client bound to this transaction.
    fn client(&self) -> Arc<dyn StorageClient>;
}

/// A half-open range of row handles `[low, high)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleRange {
    /// Inclusive lower bound.
    pub low: i64,
    /// Exclusive upper bound.
    pub high: i64,
}

impl HandleRange {
    /// Creates a range.
    #[must_use]
    pub const fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    /// The range covering every handle.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            low: i64::MIN,
            high: i64::MAX,
        }
    }

    /// Returns whether the range is the full range.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.low == i64::MIN && self.high == i64::MAX
    }
}

impl fmt::Display for HandleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_full() {
            f.write_str("[-inf,+inf)")
        } else {
            write!(f, "[{},{})", self.low, self.high)
        }
    }
}
