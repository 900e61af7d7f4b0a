//! HTTP server for Everbook.
//!
//! Fronts the append-only guestbook ledger over HTTP: append and read
//! endpoints, an SSE change-notification stream, and bearer-token identity
//! binding so a caller can only ever write as itself.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use auth::Credentials;
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{AppState, EverbookServer};
