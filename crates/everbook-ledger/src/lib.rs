//! Append-only entry ledger for Everbook.
//!
//! This crate is the heart of Everbook. It provides:
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - `InMemoryLedger` implementation for tests, demos, and embedding
//! - A `CommitGate` modelling the external commit mechanism's accept/reject
//!   decision (host-imposed ceilings only; entry content is never validated)
//! - `ChangeNotifier`, the advisory at-least-once push channel observers use
//!   to learn that the ledger changed
//!
//! The ledger owns canonical entry data. Entries are accepted in commit
//! order, timestamps are ledger-assigned and monotonic non-decreasing, and
//! no delete, update, or reorder operation exists anywhere in the API.

pub mod error;
pub mod gate;
pub mod memory;
pub mod notify;
pub mod records;
pub mod traits;

pub use error::LedgerError;
pub use gate::{CommitGate, FnGate, GateDecision, HostGate, OpenGate};
pub use memory::InMemoryLedger;
pub use notify::{ChangeNotifier, NoticeStream};
pub use records::{AppendNotice, AppendReceipt};
pub use traits::{LedgerReader, LedgerWriter};
