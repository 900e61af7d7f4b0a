use std::convert::Infallible;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::Json;
use futures::Stream;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

use everbook_ledger::{LedgerReader, LedgerWriter};
use everbook_protocol::{
    AppendRequest, AppendResponse, EntriesResponse, EventFrame, HealthResponse, PROTOCOL_VERSION,
};

use crate::auth::Credentials;
use crate::error::{ServerError, ServerResult};
use crate::server::AppState;

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "everbook-server",
        "version": env!("CARGO_PKG_VERSION"),
        "protocol_version": PROTOCOL_VERSION,
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct WindowParams {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

/// `GET /v1/entries` — the full sequence in acceptance order, or a window
/// of it when `offset`/`limit` are given.
pub async fn entries_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<WindowParams>,
) -> ServerResult<Json<EntriesResponse>> {
    authorize_read(&state, &headers)?;

    let entries = match (params.offset, params.limit) {
        (None, None) => state.ledger.read_all()?,
        (offset, limit) => state
            .ledger
            .read_window(offset.unwrap_or(0), limit.unwrap_or(u64::MAX))?,
    };
    Ok(Json(EntriesResponse { entries }))
}

/// `POST /v1/entries` — append an entry attributed to the bearer identity.
pub async fn append_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AppendRequest>,
) -> ServerResult<(StatusCode, Json<AppendResponse>)> {
    let sender = Credentials::from_headers(&headers)?.bind_sender()?;
    let receipt = state
        .ledger
        .append(&sender, &request.name, &request.message)?;
    info!(seq = receipt.seq, sender = %sender, "entry appended");
    Ok((
        StatusCode::CREATED,
        Json(AppendResponse {
            seq: receipt.seq,
            timestamp: receipt.timestamp,
        }),
    ))
}

/// `GET /v1/events` — server-sent stream of append notices.
///
/// Frames are advisory: a consumer responds with a fresh read. A lagged
/// consumer receives a `lagged` event instead of the missed frames, which
/// triggers the same resync.
pub async fn events_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ServerResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    authorize_read(&state, &headers)?;

    let notices = state.ledger.subscribe();
    let stream = futures::stream::unfold(notices, |mut notices| async move {
        loop {
            match notices.recv().await {
                Ok(notice) => {
                    let frame = EventFrame::from(notice);
                    match Event::default().event("append").json_data(&frame) {
                        Ok(event) => return Some((Ok(event), notices)),
                        Err(_) => continue,
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    let event = Event::default().event("lagged").data(skipped.to_string());
                    return Some((Ok(event), notices));
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn authorize_read(state: &AppState, headers: &HeaderMap) -> ServerResult<()> {
    let creds = Credentials::from_headers(headers)?;
    if creds.is_anonymous() && !state.allow_anonymous_read {
        return Err(ServerError::AuthFailed(
            "reading requires bearer credentials".into(),
        ));
    }
    Ok(())
}
