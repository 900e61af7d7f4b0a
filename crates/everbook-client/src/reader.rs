use std::sync::Arc;

use everbook_types::Entry;

use crate::error::ClientResult;
use crate::transport::LedgerTransport;

/// On-demand full read of the ledger sequence.
///
/// Pure and idempotent from the caller's perspective: two pulls with no
/// intervening append return identical sequences. A pull may fail only
/// because the ledger is unreachable, in which case the error is transient
/// and whatever view the caller holds is left untouched.
pub struct Reader<T> {
    transport: Arc<T>,
}

impl<T: LedgerTransport> Reader<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub async fn pull(&self) -> ClientResult<Vec<Entry>> {
        self.transport.fetch_entries().await
    }
}
