use thiserror::Error;

use everbook_client::ClientError;
use everbook_ledger::LedgerError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl SdkError {
    /// Returns `true` if the submission itself was refused (as opposed to
    /// the ledger being unreachable).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Client(ClientError::Rejected { .. }) | Self::Ledger(LedgerError::Rejected { .. })
        )
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
