//! Client-side synchronization for Everbook.
//!
//! Composes three small pieces into a consistent local view of the ledger:
//! - [`Reader`] pulls the full current sequence on demand
//! - [`Writer`] submits appends and exposes an observable lifecycle
//! - [`SyncOrchestrator`] turns advisory change notices into fresh pulls,
//!   replacing the local view wholesale and discarding stale in-flight
//!   results so an applied view never regresses
//!
//! The local view is a disposable projection: it may be discarded and
//! rebuilt at any time without loss of correctness, and it never shows an
//! entry the ledger has not durably committed.

pub mod error;
pub mod reader;
pub mod sync;
pub mod transport;
pub mod writer;

pub use error::{ClientError, ClientResult};
pub use reader::Reader;
pub use sync::{LocalView, PullOutcome, PullTicket, SyncConfig, SyncOrchestrator, ViewState};
pub use transport::{LedgerTransport, LocalTransport};
pub use writer::{WriteStatus, Writer};
