use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use web_analytics::app;
use web_analytics::config::{Args, RATE_LIMIT_WINDOW};
use web_analytics::geo::GeoClient;
use web_analytics::rate_limit::RateLimiter;
use web_analytics::state::AppState;
use web_analytics::store::{EventStore, MemoryStore};
use web_analytics::worker::persist_worker;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // parse cli arguments (env-overridable)
    let args = Args::parse();

    let (events_tx, events_rx) = mpsc::channel(100);
    let store: Arc<dyn EventStore> = Arc::new(MemoryStore::new());
    let geo = GeoClient::new(args.geo_url.clone(), Duration::from_secs(args.geo_cache_ttl));

    // creating shared state
    let state = Arc::new(AppState {
        limiter: RateLimiter::new(args.rate_limit, RATE_LIMIT_WINDOW),
        store: Arc::clone(&store),
        events_tx,
    });

    // spawn the background persistence worker
    tokio::spawn(persist_worker(events_rx, geo, store));

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    info!("Analytics service running on http://localhost:{}", args.port);
    info!("Geolocation lookups via {}", args.geo_url);
    info!(
        "Rate limit: {} requests per {} second window",
        args.rate_limit,
        RATE_LIMIT_WINDOW.as_secs()
    );

    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .unwrap();

    info!("Analytics service stopped");
}

// Wait for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
