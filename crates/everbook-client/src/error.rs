use thiserror::Error;

use everbook_ledger::LedgerError;

/// Errors surfaced by the client layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The commit mechanism refused the append. Not retried automatically.
    #[error("submission rejected: {reason}")]
    Rejected { reason: String },

    /// The ledger could not be reached. Safe to retry with backoff; any
    /// cached view is left untouched.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The change-notification stream ended; the ledger side is gone.
    #[error("notification stream closed")]
    NotifierClosed,

    #[error("internal client error: {0}")]
    Internal(String),
}

impl ClientError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<LedgerError> for ClientError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Rejected { reason } => Self::Rejected { reason },
            LedgerError::Unavailable(msg) => Self::Unavailable(msg),
            LedgerError::Internal(msg) => Self::Internal(msg),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_error_mapping_preserves_taxonomy() {
        let rejected: ClientError = LedgerError::Rejected {
            reason: "too big".into(),
        }
        .into();
        assert_eq!(
            rejected,
            ClientError::Rejected {
                reason: "too big".into()
            }
        );
        assert!(!rejected.is_transient());

        let unavailable: ClientError = LedgerError::Unavailable("down".into()).into();
        assert!(unavailable.is_transient());
    }
}
