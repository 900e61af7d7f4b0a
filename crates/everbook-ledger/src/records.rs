use serde::{Deserialize, Serialize};

use everbook_types::{SenderId, Timestamp};

/// Returned once an append is durably committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendReceipt {
    /// 1-based position of the entry in acceptance order.
    pub seq: u64,
    /// Ledger-assigned acceptance timestamp.
    pub timestamp: Timestamp,
}

/// Advisory payload pushed to observers after a successful append.
///
/// The notice describes the committed entry but is never authoritative:
/// observers must re-read the ledger rather than apply the payload to any
/// local view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendNotice {
    pub seq: u64,
    pub sender: SenderId,
    pub name: String,
    pub message: String,
    pub timestamp: Timestamp,
}
