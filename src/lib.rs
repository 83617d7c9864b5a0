//! Web analytics ingestion and query service.
//!
//! Accepts page-view events over HTTP, enriches them with coarse
//! geolocation, persists them through the event store boundary and serves
//! per-page aggregates. Ingestion is guarded by a per-client fixed-window
//! rate limiter.

pub mod config;
pub mod error;
pub mod geo;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod store;
pub mod worker;

use std::sync::Arc;

use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::handlers::{analytics_handler, health_handler, metrics_handler, track_handler};
use crate::state::AppState;

// Build the router with all routes and the permissive CORS policy the
// tracking snippet relies on.
pub fn app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/track", post(track_handler))
        .route("/analytics", get(analytics_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(cors)
        .with_state(state)
}
