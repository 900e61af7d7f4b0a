use std::sync::RwLock;

use tracing::debug;

use everbook_types::{Entry, SenderId, Timestamp};

use crate::error::LedgerError;
use crate::gate::{CommitGate, GateDecision, HostGate};
use crate::notify::{ChangeNotifier, NoticeStream};
use crate::records::{AppendNotice, AppendReceipt};
use crate::traits::{LedgerReader, LedgerWriter};

/// In-memory ledger implementation for tests, demos, and embedding.
///
/// Appends are serialized by the write lock, which stands in for the
/// external commit mechanism's total order: acceptance order is the order
/// in which appends acquire the lock, and may differ from submission order
/// under concurrent submissions. Timestamps are assigned under the lock and
/// clamped to the previous entry's timestamp, so they are monotonic
/// non-decreasing in acceptance order even if the wall clock regresses.
pub struct InMemoryLedger {
    gate: Box<dyn CommitGate>,
    notifier: ChangeNotifier,
    inner: RwLock<Vec<Entry>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::with_gate(Box::new(HostGate::default()))
    }

    /// Build a ledger with a custom commit gate.
    pub fn with_gate(gate: Box<dyn CommitGate>) -> Self {
        Self::with_parts(gate, ChangeNotifier::default())
    }

    /// Build a ledger with a custom gate and notifier (e.g. a different
    /// channel capacity).
    pub fn with_parts(gate: Box<dyn CommitGate>, notifier: ChangeNotifier) -> Self {
        Self {
            gate,
            notifier,
            inner: RwLock::new(Vec::new()),
        }
    }

    /// Subscribe to append notices. See [`ChangeNotifier`].
    pub fn subscribe(&self) -> NoticeStream {
        self.notifier.subscribe()
    }

    /// The change notifier feeding this ledger's observers.
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    fn read_locked(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<Entry>>, LedgerError> {
        self.inner
            .read()
            .map_err(|_| LedgerError::Internal("ledger read lock poisoned".into()))
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerWriter for InMemoryLedger {
    fn append(
        &self,
        caller: &SenderId,
        name: &str,
        message: &str,
    ) -> Result<AppendReceipt, LedgerError> {
        // Gate first: a rejected append must not touch the sequence.
        if let GateDecision::Rejected { reason } = self.gate.evaluate(caller, name, message) {
            debug!(caller = %caller, %reason, "append rejected by commit gate");
            return Err(LedgerError::Rejected { reason });
        }

        let notice = {
            let mut entries = self
                .inner
                .write()
                .map_err(|_| LedgerError::Internal("ledger write lock poisoned".into()))?;

            let floor = entries
                .last()
                .map(|e| e.timestamp)
                .unwrap_or_else(Timestamp::zero);
            let timestamp = Timestamp::now().max(floor);

            let entry = Entry::new(caller.clone(), name, message, timestamp);
            entries.push(entry);
            let seq = entries.len() as u64;

            AppendNotice {
                seq,
                sender: caller.clone(),
                name: name.to_string(),
                message: message.to_string(),
                timestamp,
            }
        };

        // Notify only after the entry is committed, outside the lock.
        let receipt = AppendReceipt {
            seq: notice.seq,
            timestamp: notice.timestamp,
        };
        debug!(seq = notice.seq, sender = %notice.sender, "entry appended");
        self.notifier.notify(notice);
        Ok(receipt)
    }
}

impl LedgerReader for InMemoryLedger {
    fn read_all(&self) -> Result<Vec<Entry>, LedgerError> {
        Ok(self.read_locked()?.clone())
    }

    fn read_window(&self, offset: u64, limit: u64) -> Result<Vec<Entry>, LedgerError> {
        let entries = self.read_locked()?;
        let start = (offset as usize).min(entries.len());
        let end = start.saturating_add(limit as usize).min(entries.len());
        Ok(entries[start..end].to_vec())
    }

    fn entry_count(&self) -> Result<u64, LedgerError> {
        Ok(self.read_locked()?.len() as u64)
    }
}
