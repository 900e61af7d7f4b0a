use serde::{Deserialize, Serialize};

use everbook_ledger::AppendNotice;
use everbook_types::{Entry, SenderId, Timestamp};

/// Wire protocol version, negotiated via `/v1/info`.
pub const PROTOCOL_VERSION: u32 = 1;

/// Body of `POST /v1/entries`. No sender field by design.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendRequest {
    pub name: String,
    pub message: String,
}

/// Returned once the append is durably committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendResponse {
    pub seq: u64,
    pub timestamp: Timestamp,
}

/// Body of `GET /v1/entries`: the sequence in acceptance order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntriesResponse {
    pub entries: Vec<Entry>,
}

/// One server-sent event on `GET /v1/events`.
///
/// Mirrors [`AppendNotice`]; advisory only. Clients must respond with a
/// fresh read, never by applying the frame to their view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFrame {
    pub seq: u64,
    pub sender: SenderId,
    pub name: String,
    pub message: String,
    pub timestamp: Timestamp,
}

impl From<AppendNotice> for EventFrame {
    fn from(notice: AppendNotice) -> Self {
        Self {
            seq: notice.seq,
            sender: notice.sender,
            name: notice.name,
            message: notice.message,
            timestamp: notice.timestamp,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".into(),
        }
    }
}

/// Error body for non-2xx responses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
