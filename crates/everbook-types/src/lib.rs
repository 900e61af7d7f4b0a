//! Foundation types for Everbook.
//!
//! This crate provides the identity, temporal, and record types shared by
//! every other Everbook crate.
//!
//! # Key Types
//!
//! - [`SenderId`] — Caller identity bound to an entry at append time
//! - [`Timestamp`] — Ledger-assigned acceptance time, milliseconds
//! - [`Entry`] — One immutable guestbook record

pub mod entry;
pub mod error;
pub mod sender;
pub mod timestamp;

pub use entry::Entry;
pub use error::TypeError;
pub use sender::{IdentitySource, SenderId};
pub use timestamp::Timestamp;
