//! High-level SDK for Everbook.
//!
//! [`Everbook`] composes an in-process ledger with the client layer into a
//! single handle: sign the book, read it, and keep a live synchronized
//! view, without wiring the pieces by hand.

pub mod book;
pub mod error;

pub use book::Everbook;
pub use error::{SdkError, SdkResult};
