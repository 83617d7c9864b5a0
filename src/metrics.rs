use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("analytics_track_requests_total", "Total number of track requests").unwrap();
    pub static ref REQUESTS_REJECTED: Counter = register_counter!(
        "analytics_track_requests_rejected_total",
        "Track requests rejected by the rate limiter"
    )
    .unwrap();
    pub static ref GEO_CACHE_HITS: Counter =
        register_counter!("analytics_geo_cache_hits_total", "Total geolocation cache hits").unwrap();
    pub static ref GEO_CACHE_MISSES: Counter =
        register_counter!("analytics_geo_cache_misses_total", "Total geolocation cache misses").unwrap();
    pub static ref INGEST_LATENCY: Histogram = register_histogram!(
        "analytics_ingest_latency_seconds",
        "Ingestion latency in seconds"
    )
    .unwrap();
    pub static ref TRACKED_CLIENTS: Gauge = register_gauge!(
        "analytics_rate_limit_clients",
        "Distinct clients tracked by the rate limiter"
    )
    .unwrap();
    pub static ref GEO_CACHE_SIZE: Gauge = register_gauge!(
        "analytics_geo_cache_size",
        "Current number of cached geolocation entries"
    )
    .unwrap();
}
