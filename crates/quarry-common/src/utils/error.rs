//! Error types shared by every Quarry crate.
//!
//! Compilation short-circuits on the first error: every recursive step
//! returns [`Result`] and the caller never sees a partially built tree.

use thiserror::Error;

use crate::types::TableId;

/// Result type alias for Quarry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The plan tree contains a node kind this compiler does not handle.
    #[error("unsupported plan: {0}")]
    UnsupportedPlan(String),

    /// A join node carries a join type with no hash-join strategy.
    #[error("unknown join type: {0}")]
    UnknownJoinType(String),

    /// The plan is structurally invalid (for example a non-column equality key).
    #[error("malformed plan: {0}")]
    MalformedPlan(String),

    /// Transaction state error.
    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),

    /// The request is valid but not implemented for this target.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// The catalog has no table with this id.
    #[error("table not found: {0}")]
    TableNotFound(TableId),

    /// Plan recursion went past the configured limit.
    #[error("plan too deep: depth {depth} exceeds limit {limit}")]
    PlanTooDeep {
        /// Depth at which the limit was hit.
        depth: usize,
        /// Configured limit.
        limit: usize,
    },

    /// Wire-format encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(String),

    /// Internal invariant violated.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Transaction-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    /// No transaction is active on the session.
    #[error("transaction not started")]
    NotStarted,
}
