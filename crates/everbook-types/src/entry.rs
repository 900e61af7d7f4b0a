use serde::{Deserialize, Serialize};

use crate::sender::SenderId;
use crate::timestamp::Timestamp;

/// One immutable guestbook record.
///
/// Entries are constructed by the ledger, never by callers: `sender` is
/// bound to the authenticated caller of the append operation and
/// `timestamp` is assigned at acceptance. `name` and `message` are
/// arbitrary caller-supplied text — no length or content validation is
/// performed anywhere, which is a deliberate scope boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub sender: SenderId,
    pub name: String,
    pub message: String,
    pub timestamp: Timestamp,
}

impl Entry {
    pub fn new(
        sender: SenderId,
        name: impl Into<String>,
        message: impl Into<String>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            sender,
            name: name.into(),
            message: message.into(),
            timestamp,
        }
    }
}
