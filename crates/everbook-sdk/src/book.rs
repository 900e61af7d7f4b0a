use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use everbook_client::{
    LocalTransport, LocalView, Reader, SyncConfig, SyncOrchestrator, WriteStatus, Writer,
};
use everbook_ledger::{AppendReceipt, InMemoryLedger, LedgerReader, NoticeStream};
use everbook_types::{Entry, SenderId};

use crate::error::SdkResult;

/// An embedded guestbook handle for one caller.
///
/// Multiple handles may share one ledger (see [`Everbook::open_shared`]);
/// each handle signs as its own identity while all of them observe the
/// same authoritative sequence.
pub struct Everbook {
    caller: SenderId,
    ledger: Arc<InMemoryLedger>,
    transport: Arc<LocalTransport>,
    reader: Reader<LocalTransport>,
    writer: Writer<LocalTransport>,
}

impl Everbook {
    /// Open a fresh book with an ephemeral caller identity.
    pub fn open() -> Self {
        Self::open_shared(Arc::new(InMemoryLedger::new()), SenderId::ephemeral())
    }

    /// Open a fresh book signing as `caller`.
    pub fn open_as(caller: SenderId) -> Self {
        Self::open_shared(Arc::new(InMemoryLedger::new()), caller)
    }

    /// Attach to an existing ledger as `caller`.
    pub fn open_shared(ledger: Arc<InMemoryLedger>, caller: SenderId) -> Self {
        let transport = Arc::new(LocalTransport::new(Arc::clone(&ledger), caller.clone()));
        let reader = Reader::new(Arc::clone(&transport));
        let writer = Writer::new(Arc::clone(&transport));
        debug!(caller = %caller, "book opened");
        Self {
            caller,
            ledger,
            transport,
            reader,
            writer,
        }
    }

    // ---- Writing ----

    /// Sign the book. Suspends until the append is durably committed or
    /// rejected; the live view catches up via the change notifier.
    pub async fn sign(&self, name: &str, message: &str) -> SdkResult<AppendReceipt> {
        Ok(self.writer.submit(name, message).await?)
    }

    /// Watch the submission lifecycle of this handle's writer.
    pub fn write_status(&self) -> watch::Receiver<WriteStatus> {
        self.writer.status()
    }

    // ---- Reading ----

    /// The full current sequence in acceptance order.
    pub async fn entries(&self) -> SdkResult<Vec<Entry>> {
        Ok(self.reader.pull().await?)
    }

    pub fn entry_count(&self) -> SdkResult<u64> {
        Ok(self.ledger.entry_count()?)
    }

    /// Subscribe to raw append notices.
    pub fn subscribe(&self) -> NoticeStream {
        self.ledger.subscribe()
    }

    // ---- Synchronization ----

    /// Spawn a sync orchestrator and return the live local view.
    ///
    /// The background task ends when the ledger (and with it the notice
    /// stream) is dropped. Requires a tokio runtime.
    pub fn spawn_sync(&self) -> watch::Receiver<LocalView> {
        self.spawn_sync_with(SyncConfig::default())
    }

    pub fn spawn_sync_with(&self, config: SyncConfig) -> watch::Receiver<LocalView> {
        let orchestrator = SyncOrchestrator::new(Arc::clone(&self.transport));
        let view = orchestrator.view();
        tokio::spawn(async move {
            if let Err(err) = orchestrator.run(config).await {
                tracing::warn!(error = %err, "sync loop ended with error");
            }
        });
        view
    }

    // ---- Accessors ----

    pub fn caller(&self) -> &SenderId {
        &self.caller
    }

    pub fn ledger(&self) -> Arc<InMemoryLedger> {
        Arc::clone(&self.ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use everbook_ledger::{HostGate, LedgerWriter};
    use std::time::Duration;

    fn fast_config() -> SyncConfig {
        SyncConfig {
            poll_interval: Duration::from_millis(50),
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(100),
        }
    }

    #[tokio::test]
    async fn empty_book_reads_empty() {
        let book = Everbook::open();
        assert!(book.entries().await.unwrap().is_empty());
        assert_eq!(book.entry_count().unwrap(), 0);
    }

    #[tokio::test]
    async fn sign_then_read() {
        let book = Everbook::open();
        let receipt = book.sign("John Doe", "Hello, World!").await.unwrap();
        assert_eq!(receipt.seq, 1);

        let entries = book.entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].sender, *book.caller());
        assert_eq!(entries[0].name, "John Doe");
        assert_eq!(entries[0].message, "Hello, World!");
        assert!(entries[0].timestamp.is_positive());
    }

    #[tokio::test]
    async fn two_guests_share_one_book() {
        let ledger = Arc::new(InMemoryLedger::new());
        let x = Everbook::open_shared(Arc::clone(&ledger), SenderId::ephemeral());
        let y = Everbook::open_shared(ledger, SenderId::ephemeral());

        x.sign("John Doe", "Hello, World!").await.unwrap();
        y.sign("Jane Smith", "Hi there!").await.unwrap();

        let entries = x.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].sender, *x.caller());
        assert_eq!(entries[1].sender, *y.caller());
    }

    #[tokio::test]
    async fn rejected_signature_changes_nothing() {
        let ledger = Arc::new(InMemoryLedger::with_gate(Box::new(HostGate {
            max_payload_bytes: 8,
        })));
        let book = Everbook::open_shared(ledger, SenderId::ephemeral());

        book.sign("ok", "fits").await.unwrap();
        let before = book.entry_count().unwrap();

        let err = book.sign("too", "long for the ceiling").await.unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(book.entry_count().unwrap(), before);
    }

    #[tokio::test]
    async fn write_status_tracks_lifecycle() {
        let book = Everbook::open();
        let status = book.write_status();
        assert_eq!(*status.borrow(), WriteStatus::Idle);

        book.sign("g", "m").await.unwrap();
        assert!(matches!(*status.borrow(), WriteStatus::Accepted { .. }));
    }

    #[tokio::test]
    async fn live_view_converges_after_sign() {
        let book = Everbook::open();
        let mut view = book.spawn_sync_with(fast_config());

        view.wait_for(|v| v.is_loaded()).await.unwrap();
        book.sign("John Doe", "Hello, World!").await.unwrap();

        let converged = tokio::time::timeout(
            Duration::from_secs(2),
            view.wait_for(|v| v.len() == 1),
        )
        .await
        .expect("view did not converge")
        .unwrap();
        assert_eq!(converged.entries[0].name, "John Doe");
    }

    #[tokio::test]
    async fn view_sees_other_guests_signatures() {
        let ledger = Arc::new(InMemoryLedger::new());
        let observer = Everbook::open_shared(Arc::clone(&ledger), SenderId::ephemeral());
        let mut view = observer.spawn_sync_with(fast_config());
        view.wait_for(|v| v.is_loaded()).await.unwrap();

        // A write from outside this handle still reaches the view.
        let other = SenderId::ephemeral();
        ledger.append(&other, "Jane Smith", "Hi there!").unwrap();

        let converged = tokio::time::timeout(
            Duration::from_secs(2),
            view.wait_for(|v| v.len() == 1),
        )
        .await
        .expect("view did not converge")
        .unwrap();
        assert_eq!(converged.entries[0].sender, other);
    }
}
