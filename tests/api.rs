use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use web_analytics::app;
use web_analytics::config::RATE_LIMIT_WINDOW;
use web_analytics::geo::GeoClient;
use web_analytics::rate_limit::RateLimiter;
use web_analytics::state::AppState;
use web_analytics::store::{EventStore, MemoryStore};
use web_analytics::worker::persist_worker;

// Spin up the whole service on an ephemeral port. The geolocation base URL
// points at the discard port so enrichment exercises its fallback path.
async fn spawn_app(max_requests: u32) -> String {
    let (events_tx, events_rx) = mpsc::channel(100);
    let store: Arc<dyn EventStore> = Arc::new(MemoryStore::new());
    let geo = GeoClient::new("http://127.0.0.1:9".to_string(), Duration::from_secs(60));

    let state = Arc::new(AppState {
        limiter: RateLimiter::new(max_requests, RATE_LIMIT_WINDOW),
        store: Arc::clone(&store),
        events_tx,
    });

    tokio::spawn(persist_worker(events_rx, geo, store));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app(state).into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn health_reports_healthy() {
    let base = spawn_app(100).await;

    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "healthy");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn track_then_analytics_aggregates_views() {
    let base = spawn_app(100).await;
    let client = reqwest::Client::new();

    for page_url in ["/home", "/home", "/pricing"] {
        let response = client
            .post(format!("{}/track", base))
            .json(&json!({ "page_url": page_url, "referrer": "https://news.example" }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 201);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Analytics data logged");
    }

    let stats: Value = client
        .get(format!("{}/analytics", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats[0]["page_url"], "/home");
    assert_eq!(stats[0]["views"], 2);
    assert_eq!(stats[1]["page_url"], "/pricing");
    assert_eq!(stats[1]["views"], 1);
}

#[tokio::test]
async fn missing_page_url_is_rejected() {
    let base = spawn_app(100).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/track", base))
        .json(&json!({ "referrer": "https://news.example" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "page_url is required");
}

#[tokio::test]
async fn over_budget_client_gets_429() {
    let base = spawn_app(2).await;
    let client = reqwest::Client::new();

    let post = |forwarded: &'static str| {
        let client = client.clone();
        let url = format!("{}/track", base);
        async move {
            client
                .post(url)
                .header("X-Forwarded-For", forwarded)
                .json(&json!({ "page_url": "/home" }))
                .send()
                .await
                .unwrap()
        }
    };

    assert_eq!(post("203.0.113.7").await.status(), 201);
    assert_eq!(post("203.0.113.7").await.status(), 201);

    let denied = post("203.0.113.7").await;
    assert_eq!(denied.status(), 429);
    let body: Value = denied.json().await.unwrap();
    assert_eq!(body["error"], "Too many requests, slow down!");

    // a different client is admitted at the same moment
    assert_eq!(post("198.51.100.4").await.status(), 201);
}

#[tokio::test]
async fn rejected_requests_are_not_persisted() {
    let base = spawn_app(1).await;
    let client = reqwest::Client::new();

    for _ in 0..3 {
        client
            .post(format!("{}/track", base))
            .json(&json!({ "page_url": "/only-once" }))
            .send()
            .await
            .unwrap();
    }

    let stats: Value = client
        .get(format!("{}/analytics", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(stats[0]["page_url"], "/only-once");
    assert_eq!(stats[0]["views"], 1);
}

#[tokio::test]
async fn metrics_endpoint_exposes_counters() {
    let base = spawn_app(100).await;
    let client = reqwest::Client::new();

    // touch the ingest path so the counters exist
    client
        .post(format!("{}/track", base))
        .json(&json!({ "page_url": "/home" }))
        .send()
        .await
        .unwrap();

    let body = client
        .get(format!("{}/metrics", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("analytics_track_requests_total"));
}
