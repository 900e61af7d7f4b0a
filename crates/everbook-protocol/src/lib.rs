//! Wire types shared by the Everbook server and its clients.
//!
//! All payloads are JSON over HTTP. The append request deliberately has no
//! `sender` field: attribution is bound server-side from the authenticated
//! caller, so a sender can never be spoofed on the wire.

pub mod error;
pub mod message;

pub use error::{ProtocolError, ProtocolResult};
pub use message::{
    AppendRequest, AppendResponse, EntriesResponse, ErrorResponse, EventFrame, HealthResponse,
    PROTOCOL_VERSION,
};
