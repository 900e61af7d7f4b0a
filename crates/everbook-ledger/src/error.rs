use thiserror::Error;

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The commit mechanism refused the append. Surfaced to the caller and
    /// never retried automatically; the sequence is left untouched.
    #[error("append rejected: {reason}")]
    Rejected { reason: String },

    /// The ledger could not be reached. Safe to retry with backoff.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    #[error("internal ledger error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns `true` if retrying the operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
