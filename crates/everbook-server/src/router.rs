use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::server::AppState;

/// Build the axum router with all Everbook endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route(
            "/v1/entries",
            get(handler::entries_handler).post(handler::append_handler),
        )
        .route("/v1/events", get(handler::events_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
