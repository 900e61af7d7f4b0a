use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Host ceiling on `name` + `message` bytes, enforced by the commit
    /// gate. Not content validation.
    pub max_payload_bytes: usize,
    /// Capacity of the change-notifier broadcast channel.
    pub channel_capacity: usize,
    /// Whether `GET /v1/entries` and `/v1/events` accept anonymous callers.
    pub allow_anonymous_read: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9590".parse().unwrap(),
            max_payload_bytes: 128 * 1024,
            channel_capacity: 1024,
            allow_anonymous_read: true,
        }
    }
}
