use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use everbook_ledger::AppendReceipt;
use everbook_types::Timestamp;

use crate::error::{ClientError, ClientResult};
use crate::transport::LedgerTransport;

/// Observable submission lifecycle: `Idle -> Pending -> {Accepted, Rejected}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteStatus {
    Idle,
    /// Submitted, awaiting durable commitment.
    Pending,
    /// The ledger confirmed durable commitment.
    Accepted { seq: u64, timestamp: Timestamp },
    /// The commit mechanism refused the operation, or the ledger was
    /// unreachable. The returned error preserves the distinction.
    Rejected { reason: String },
}

/// Submits entries to the ledger and reports the outcome.
///
/// The writer never inserts the entry into any local view: `Accepted` is
/// entered only once the ledger confirms commitment, and the view catches
/// up through the reader, driven by the change notifier. The visible
/// latency gap between submission and visibility is the price of never
/// showing an uncommitted entry.
pub struct Writer<T> {
    transport: Arc<T>,
    status_tx: watch::Sender<WriteStatus>,
}

impl<T: LedgerTransport> Writer<T> {
    pub fn new(transport: Arc<T>) -> Self {
        let (status_tx, _) = watch::channel(WriteStatus::Idle);
        Self {
            transport,
            status_tx,
        }
    }

    /// Watch the submission lifecycle.
    pub fn status(&self) -> watch::Receiver<WriteStatus> {
        self.status_tx.subscribe()
    }

    /// Submit `(name, message)` and suspend until accepted or rejected.
    pub async fn submit(&self, name: &str, message: &str) -> ClientResult<AppendReceipt> {
        self.status_tx.send_replace(WriteStatus::Pending);

        match self.transport.submit(name, message).await {
            Ok(receipt) => {
                debug!(seq = receipt.seq, "submission accepted");
                self.status_tx.send_replace(WriteStatus::Accepted {
                    seq: receipt.seq,
                    timestamp: receipt.timestamp,
                });
                Ok(receipt)
            }
            Err(err) => {
                debug!(error = %err, "submission failed");
                self.status_tx.send_replace(WriteStatus::Rejected {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::LocalTransport;
    use everbook_ledger::{GateDecision, HostGate, InMemoryLedger};
    use everbook_types::SenderId;

    fn local_writer(ledger: InMemoryLedger) -> Writer<LocalTransport> {
        let transport = LocalTransport::new(Arc::new(ledger), SenderId::ephemeral());
        Writer::new(Arc::new(transport))
    }

    #[tokio::test]
    async fn lifecycle_reaches_accepted() {
        let writer = local_writer(InMemoryLedger::new());
        let status = writer.status();
        assert_eq!(*status.borrow(), WriteStatus::Idle);

        let receipt = writer.submit("John Doe", "Hello, World!").await.unwrap();
        assert_eq!(
            *status.borrow(),
            WriteStatus::Accepted {
                seq: receipt.seq,
                timestamp: receipt.timestamp
            }
        );
    }

    #[tokio::test]
    async fn lifecycle_reaches_rejected() {
        let ledger = InMemoryLedger::with_gate(Box::new(HostGate {
            max_payload_bytes: 4,
        }));
        let writer = local_writer(ledger);
        let status = writer.status();

        let err = writer.submit("too", "long for the gate").await.unwrap_err();
        assert!(matches!(err, ClientError::Rejected { .. }));
        assert!(matches!(
            &*status.borrow(),
            WriteStatus::Rejected { reason } if reason.contains("host ceiling")
        ));
    }

    #[tokio::test]
    async fn rejection_reason_carries_gate_text() {
        let ledger = InMemoryLedger::with_gate(Box::new(everbook_ledger::FnGate(
            |_: &SenderId, _: &str, _: &str| GateDecision::rejected("insufficient resources"),
        )));
        let writer = local_writer(ledger);

        let err = writer.submit("g", "m").await.unwrap_err();
        assert_eq!(
            err,
            ClientError::Rejected {
                reason: "insufficient resources".into()
            }
        );
    }
}
