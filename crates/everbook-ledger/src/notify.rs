use tokio::sync::broadcast;
use tracing::debug;

use crate::records::AppendNotice;

/// A broadcast receiver of append notices.
pub type NoticeStream = broadcast::Receiver<AppendNotice>;

/// One-directional push channel from the ledger to interested observers.
///
/// Delivery is at-least-once per live subscriber and the payload is
/// advisory only: it signals "the ledger changed" and must never be applied
/// to a local view as authoritative state. A subscriber that falls behind
/// observes `Lagged` on its receiver, which simply means "re-read the
/// ledger" — no authoritative data is lost because none is carried here.
pub struct ChangeNotifier {
    sender: broadcast::Sender<AppendNotice>,
}

impl ChangeNotifier {
    /// Channel capacity bounds how far a subscriber may lag before it
    /// observes `Lagged` instead of individual notices.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new observer. Every observer independently receives
    /// every notice emitted after subscription.
    pub fn subscribe(&self) -> NoticeStream {
        self.sender.subscribe()
    }

    /// Deliver a notice to all current observers. Best-effort: with no
    /// observers the notice is dropped, which is fine — observers that
    /// arrive later rebuild their view with a full read.
    pub fn notify(&self, notice: AppendNotice) {
        match self.sender.send(notice) {
            Ok(delivered) => debug!(observers = delivered, "append notice delivered"),
            Err(_) => debug!("append notice dropped; no observers"),
        }
    }

    /// Number of currently subscribed observers.
    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(1024)
    }
}
