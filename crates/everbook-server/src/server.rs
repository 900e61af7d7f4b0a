use std::sync::Arc;

use tokio::net::TcpListener;

use everbook_ledger::{ChangeNotifier, HostGate, InMemoryLedger};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<InMemoryLedger>,
    pub allow_anonymous_read: bool,
}

/// The Everbook guestbook server.
pub struct EverbookServer {
    config: ServerConfig,
    ledger: Arc<InMemoryLedger>,
}

impl EverbookServer {
    pub fn new(config: ServerConfig) -> Self {
        let ledger = Arc::new(InMemoryLedger::with_parts(
            Box::new(HostGate {
                max_payload_bytes: config.max_payload_bytes,
            }),
            ChangeNotifier::new(config.channel_capacity),
        ));
        Self { config, ledger }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The ledger this server fronts. Useful for embedding and tests.
    pub fn ledger(&self) -> Arc<InMemoryLedger> {
        Arc::clone(&self.ledger)
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(AppState {
            ledger: Arc::clone(&self.ledger),
            allow_anonymous_read: self.config.allow_anonymous_read,
        })
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("everbook server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
