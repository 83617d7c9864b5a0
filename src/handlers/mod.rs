mod analytics;
mod health;
mod metrics;
mod track;

pub use analytics::analytics_handler;
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use track::track_handler;
