use std::sync::Arc;

use async_trait::async_trait;

use everbook_ledger::{
    AppendReceipt, InMemoryLedger, LedgerReader, LedgerWriter, NoticeStream,
};
use everbook_types::{Entry, SenderId};

use crate::error::ClientResult;

/// Transport seam between the client layer and a ledger.
///
/// Implementations carry the caller's identity; `submit` never takes a
/// sender argument. Long-latency, unbounded-duration operations: both calls
/// suspend until the ledger answers.
#[async_trait]
pub trait LedgerTransport: Send + Sync {
    /// Fetch the full current sequence in acceptance order.
    async fn fetch_entries(&self) -> ClientResult<Vec<Entry>>;

    /// Submit an append and wait for durable commitment.
    async fn submit(&self, name: &str, message: &str) -> ClientResult<AppendReceipt>;

    /// Subscribe to the ledger's advisory change notices.
    fn subscribe(&self) -> ClientResult<NoticeStream>;
}

/// Transport onto an in-process [`InMemoryLedger`], for embedding and tests.
pub struct LocalTransport {
    ledger: Arc<InMemoryLedger>,
    caller: SenderId,
}

impl LocalTransport {
    pub fn new(ledger: Arc<InMemoryLedger>, caller: SenderId) -> Self {
        Self { ledger, caller }
    }

    pub fn caller(&self) -> &SenderId {
        &self.caller
    }
}

#[async_trait]
impl LedgerTransport for LocalTransport {
    async fn fetch_entries(&self) -> ClientResult<Vec<Entry>> {
        Ok(self.ledger.read_all()?)
    }

    async fn submit(&self, name: &str, message: &str) -> ClientResult<AppendReceipt> {
        Ok(self.ledger.append(&self.caller, name, message)?)
    }

    fn subscribe(&self) -> ClientResult<NoticeStream> {
        Ok(self.ledger.subscribe())
    }
}
