use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant};
use tracing::{debug, warn};

use everbook_types::Entry;

use crate::error::ClientResult;
use crate::transport::LedgerTransport;

/// Lifecycle of the local view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewState {
    /// No pull has succeeded yet.
    Uninitialized,
    /// At least one pull has been applied; re-entered on every change.
    Loaded,
}

/// The client-held, fully replaceable copy of the ledger sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalView {
    pub state: ViewState,
    pub entries: Vec<Entry>,
}

impl LocalView {
    fn empty() -> Self {
        Self {
            state: ViewState::Uninitialized,
            entries: Vec::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state == ViewState::Loaded
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Initiation-order token for one pull. Tickets are handed out in strictly
/// increasing order; result application compares tickets, not completion
/// times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PullTicket(u64);

/// What happened to one pull's result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PullOutcome {
    /// The view was replaced wholesale with this pull's sequence.
    Applied,
    /// A pull initiated later was already applied; this result was dropped
    /// so the view cannot regress to an older snapshot. Internal condition,
    /// never surfaced to callers.
    DiscardedStale,
}

/// Tuning for the orchestrator's run loop.
#[derive(Clone, Debug)]
pub struct SyncConfig {
    /// Fallback poll period. Notices are best-effort and may be dropped, so
    /// the orchestrator also pulls unprompted at this interval.
    pub poll_interval: Duration,
    /// First retry delay after a transient pull failure.
    pub initial_backoff: Duration,
    /// Retry delay ceiling.
    pub max_backoff: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }
}

/// Composes reader, writer, and change notifier into a consistent local
/// view: every notification triggers a fresh full read, and the view is
/// replaced wholesale rather than patched.
///
/// There is deliberately no incremental merge logic. Replacing the whole
/// view on every change sidesteps deduplication and partial-update
/// ordering entirely, trading bandwidth for correctness. When pulls
/// overlap, only the most recently initiated pull may be applied; results
/// of superseded pulls are discarded (see [`PullOutcome::DiscardedStale`]).
/// Result application is always a single synchronous step on one control
/// flow, so two applications never interleave.
pub struct SyncOrchestrator<T> {
    transport: Arc<T>,
    view_tx: watch::Sender<LocalView>,
    next_ticket: u64,
    last_applied: u64,
}

impl<T: LedgerTransport> SyncOrchestrator<T> {
    pub fn new(transport: Arc<T>) -> Self {
        let (view_tx, _) = watch::channel(LocalView::empty());
        Self {
            transport,
            view_tx,
            next_ticket: 0,
            last_applied: 0,
        }
    }

    /// Watch the local view. Receivers see every applied replacement.
    pub fn view(&self) -> watch::Receiver<LocalView> {
        self.view_tx.subscribe()
    }

    /// Record the initiation of a pull.
    pub fn begin_pull(&mut self) -> PullTicket {
        self.next_ticket += 1;
        PullTicket(self.next_ticket)
    }

    /// Apply one completed pull's result.
    ///
    /// The result is applied only if no later-initiated pull has been
    /// applied; otherwise it is dropped. Because the ledger is append-only,
    /// applying the later-initiated of two pulls also guarantees the view's
    /// length never decreases.
    pub fn apply(&mut self, ticket: PullTicket, entries: Vec<Entry>) -> PullOutcome {
        if ticket.0 <= self.last_applied {
            debug!(ticket = ticket.0, applied = self.last_applied, "stale pull result discarded");
            return PullOutcome::DiscardedStale;
        }
        self.last_applied = ticket.0;
        self.view_tx.send_replace(LocalView {
            state: ViewState::Loaded,
            entries,
        });
        PullOutcome::Applied
    }

    /// Initiate, await, and apply a single pull.
    ///
    /// On failure the view is left exactly as it was.
    pub async fn pull_now(&mut self) -> ClientResult<PullOutcome> {
        let ticket = self.begin_pull();
        let entries = self.transport.fetch_entries().await?;
        Ok(self.apply(ticket, entries))
    }

    /// Drive the view until the notification stream closes.
    ///
    /// Performs the initial load (retrying transient failures with bounded
    /// backoff), then re-pulls on every change notice, on notice-stream
    /// lag, and on the fallback poll interval. The notice payload itself is
    /// advisory and never applied to the view.
    pub async fn run(mut self, config: SyncConfig) -> ClientResult<()> {
        let mut notices = self.transport.subscribe()?;
        let mut backoff = config.initial_backoff;

        loop {
            match self.pull_now().await {
                Ok(_) => break,
                Err(err) if err.is_transient() => {
                    warn!(error = %err, delay = ?backoff, "initial load failed; retrying");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(config.max_backoff);
                }
                Err(err) => return Err(err),
            }
        }
        debug!("initial load applied");

        let mut backoff = config.initial_backoff;
        let mut poll = interval_at(
            Instant::now() + config.poll_interval,
            config.poll_interval,
        );

        loop {
            tokio::select! {
                received = notices.recv() => match received {
                    Ok(notice) => {
                        debug!(seq = notice.seq, "change notice received; pulling");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "notice stream lagged; pulling");
                    }
                    Err(RecvError::Closed) => {
                        debug!("notice stream closed; sync loop ending");
                        return Ok(());
                    }
                },
                _ = poll.tick() => {
                    debug!("fallback poll; pulling");
                }
            }

            match self.pull_now().await {
                Ok(_) => backoff = config.initial_backoff,
                Err(err) if err.is_transient() => {
                    warn!(error = %err, delay = ?backoff, "pull failed; backing off");
                    tokio::time::sleep(backoff).await;
                    backoff = (backoff * 2).min(config.max_backoff);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::transport::LocalTransport;
    use async_trait::async_trait;
    use everbook_ledger::{
        AppendReceipt, ChangeNotifier, InMemoryLedger, LedgerReader, LedgerWriter, NoticeStream,
    };
    use everbook_types::{SenderId, Timestamp};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entry(n: u64) -> Entry {
        Entry::new(
            SenderId::ephemeral(),
            format!("guest-{n}"),
            "hello",
            Timestamp::from_millis(n),
        )
    }

    fn fast_config() -> SyncConfig {
        SyncConfig {
            poll_interval: Duration::from_millis(50),
            initial_backoff: Duration::from_millis(10),
            max_backoff: Duration::from_millis(100),
        }
    }

    /// Transport whose notice stream never fires, forcing the poll fallback.
    struct SilentNotifier {
        ledger: Arc<InMemoryLedger>,
        caller: SenderId,
        idle: ChangeNotifier,
    }

    #[async_trait]
    impl LedgerTransport for SilentNotifier {
        async fn fetch_entries(&self) -> ClientResult<Vec<Entry>> {
            Ok(self.ledger.read_all()?)
        }

        async fn submit(&self, name: &str, message: &str) -> ClientResult<AppendReceipt> {
            Ok(self.ledger.append(&self.caller, name, message)?)
        }

        fn subscribe(&self) -> ClientResult<NoticeStream> {
            Ok(self.idle.subscribe())
        }
    }

    /// Transport that fails the first `failures` fetches, then delegates.
    struct FlakyTransport {
        inner: LocalTransport,
        remaining: AtomicUsize,
    }

    #[async_trait]
    impl LedgerTransport for FlakyTransport {
        async fn fetch_entries(&self) -> ClientResult<Vec<Entry>> {
            if self
                .remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(ClientError::Unavailable("simulated outage".into()));
            }
            self.inner.fetch_entries().await
        }

        async fn submit(&self, name: &str, message: &str) -> ClientResult<AppendReceipt> {
            self.inner.submit(name, message).await
        }

        fn subscribe(&self) -> ClientResult<NoticeStream> {
            self.inner.subscribe()
        }
    }

    #[test]
    fn stale_pull_result_is_discarded() {
        let ledger = Arc::new(InMemoryLedger::new());
        let transport = Arc::new(LocalTransport::new(ledger, SenderId::ephemeral()));
        let mut orchestrator = SyncOrchestrator::new(transport);
        let view = orchestrator.view();

        // Pull A initiated first, pull B initiated second; B completes and
        // is applied first, then A's (shorter, older) result arrives.
        let a = orchestrator.begin_pull();
        let b = orchestrator.begin_pull();

        assert_eq!(
            orchestrator.apply(b, vec![entry(1), entry(2)]),
            PullOutcome::Applied
        );
        assert_eq!(orchestrator.apply(a, vec![entry(1)]), PullOutcome::DiscardedStale);

        // The view still reflects B: no regression to the older snapshot.
        let current = view.borrow();
        assert_eq!(current.len(), 2);
        assert!(current.is_loaded());
    }

    #[test]
    fn later_initiated_pull_supersedes_in_order() {
        let ledger = Arc::new(InMemoryLedger::new());
        let transport = Arc::new(LocalTransport::new(ledger, SenderId::ephemeral()));
        let mut orchestrator = SyncOrchestrator::new(transport);
        let view = orchestrator.view();

        let a = orchestrator.begin_pull();
        assert_eq!(orchestrator.apply(a, vec![entry(1)]), PullOutcome::Applied);

        let b = orchestrator.begin_pull();
        assert_eq!(
            orchestrator.apply(b, vec![entry(1), entry(2)]),
            PullOutcome::Applied
        );
        assert_eq!(view.borrow().len(), 2);
    }

    #[tokio::test]
    async fn pull_failure_leaves_view_untouched() {
        struct Down;

        #[async_trait]
        impl LedgerTransport for Down {
            async fn fetch_entries(&self) -> ClientResult<Vec<Entry>> {
                Err(ClientError::Unavailable("down".into()))
            }
            async fn submit(&self, _: &str, _: &str) -> ClientResult<AppendReceipt> {
                Err(ClientError::Unavailable("down".into()))
            }
            fn subscribe(&self) -> ClientResult<NoticeStream> {
                Err(ClientError::Unavailable("down".into()))
            }
        }

        let mut orchestrator = SyncOrchestrator::new(Arc::new(Down));
        let view = orchestrator.view();

        let err = orchestrator.pull_now().await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(view.borrow().state, ViewState::Uninitialized);
    }

    #[tokio::test]
    async fn initial_load_reaches_loaded_on_empty_ledger() {
        let ledger = Arc::new(InMemoryLedger::new());
        let transport = Arc::new(LocalTransport::new(ledger, SenderId::ephemeral()));
        let orchestrator = SyncOrchestrator::new(transport);
        let mut view = orchestrator.view();

        tokio::spawn(orchestrator.run(fast_config()));

        let loaded = tokio::time::timeout(
            Duration::from_secs(2),
            view.wait_for(|v| v.is_loaded()),
        )
        .await
        .expect("timed out waiting for initial load")
        .unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn converges_after_append_notice() {
        let ledger = Arc::new(InMemoryLedger::new());
        let caller = SenderId::ephemeral();
        let transport = Arc::new(LocalTransport::new(Arc::clone(&ledger), caller.clone()));
        let orchestrator = SyncOrchestrator::new(transport);
        let mut view = orchestrator.view();

        tokio::spawn(orchestrator.run(fast_config()));
        view.wait_for(|v| v.is_loaded()).await.unwrap();

        ledger.append(&caller, "John Doe", "Hello, World!").unwrap();

        let converged = tokio::time::timeout(
            Duration::from_secs(2),
            view.wait_for(|v| v.len() == 1),
        )
        .await
        .expect("timed out waiting for convergence")
        .unwrap();
        assert_eq!(converged.entries[0].sender, caller);
        assert_eq!(converged.entries[0].message, "Hello, World!");
    }

    #[tokio::test]
    async fn poll_fallback_covers_dropped_notices() {
        let ledger = Arc::new(InMemoryLedger::new());
        let caller = SenderId::ephemeral();
        let transport = Arc::new(SilentNotifier {
            ledger: Arc::clone(&ledger),
            caller: caller.clone(),
            idle: ChangeNotifier::default(),
        });
        let orchestrator = SyncOrchestrator::new(transport);
        let mut view = orchestrator.view();

        tokio::spawn(orchestrator.run(fast_config()));
        view.wait_for(|v| v.is_loaded()).await.unwrap();

        // No notice will ever arrive; only the poll interval can see this.
        ledger.append(&caller, "Jane Smith", "Hi there!").unwrap();

        tokio::time::timeout(Duration::from_secs(2), view.wait_for(|v| v.len() == 1))
            .await
            .expect("poll fallback did not converge")
            .unwrap();
    }

    #[tokio::test]
    async fn initial_load_retries_transient_failures() {
        let ledger = Arc::new(InMemoryLedger::new());
        let caller = SenderId::ephemeral();
        ledger.append(&caller, "g", "m").unwrap();

        let transport = Arc::new(FlakyTransport {
            inner: LocalTransport::new(ledger, caller),
            remaining: AtomicUsize::new(3),
        });
        let orchestrator = SyncOrchestrator::new(transport);
        let mut view = orchestrator.view();

        tokio::spawn(orchestrator.run(fast_config()));

        let loaded = tokio::time::timeout(
            Duration::from_secs(2),
            view.wait_for(|v| v.is_loaded()),
        )
        .await
        .expect("retries did not recover")
        .unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[tokio::test]
    async fn view_length_is_monotone_across_appends() {
        let ledger = Arc::new(InMemoryLedger::new());
        let caller = SenderId::ephemeral();
        let transport = Arc::new(LocalTransport::new(Arc::clone(&ledger), caller.clone()));
        let mut orchestrator = SyncOrchestrator::new(transport);
        let view = orchestrator.view();

        let mut last_len = 0;
        for i in 0..5 {
            ledger.append(&caller, "g", &format!("m{i}")).unwrap();
            orchestrator.pull_now().await.unwrap();
            let len = view.borrow().len();
            assert!(len > last_len);
            last_len = len;
        }
    }
}
