use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use chrono::Utc;
use tokio::sync::oneshot;
use tracing::debug;

use crate::error::AppError;
use crate::metrics::{INGEST_LATENCY, REQUEST_TOTAL, REQUESTS_REJECTED, TRACKED_CLIENTS};
use crate::models::{PageView, RecordedEvent, TrackRequest};
use crate::rate_limit::{Admission, client_key};
use crate::state::AppState;

// Ingestion endpoint. The admission check runs before anything else; a
// denied client gets a 429 without touching the queue or the store.
pub async fn track_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<TrackRequest>,
) -> Result<impl IntoResponse, AppError> {
    REQUEST_TOTAL.inc();

    let key = client_key(&headers, Some(peer));
    if state.limiter.admit(&key, Instant::now()) == Admission::Deny {
        REQUESTS_REJECTED.inc();
        debug!(client = %key, "rate limit exceeded");
        return Err(AppError::RateLimited);
    }
    TRACKED_CLIENTS.set(state.limiter.tracked_clients() as f64);

    if payload.page_url.is_empty() {
        return Err(AppError::MissingPageUrl);
    }

    let start_time = Instant::now();

    let view = PageView {
        page_url: payload.page_url,
        referrer: payload.referrer.unwrap_or_else(|| "Direct".to_string()),
        user_agent: payload.user_agent.unwrap_or_else(|| "Unknown".to_string()),
        ip_address: key,
        country: String::new(),
        city: String::new(),
        timestamp: Utc::now(),
    };

    let (response_tx, response_rx) = oneshot::channel();

    state
        .events_tx
        .send(RecordedEvent { view, response_tx })
        .await
        .map_err(|_| AppError::QueueClosed)?;

    // wait for the worker to enrich and persist
    response_rx.await.map_err(|_| AppError::WorkerUnavailable)??;

    INGEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Analytics data logged" })),
    ))
}
