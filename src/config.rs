use std::time::Duration;

use clap::Parser;

// The counting window is fixed at one minute; only the per-window request
// budget is configurable.
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

// CLI argument structure, every flag overridable from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "web-analytics")]
#[command(about = "Web analytics ingestion and query service")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 3000, env = "PORT")]
    pub port: u16,

    // Max requests allowed per client per window
    #[arg(long, default_value_t = 100, env = "RATE_LIMIT_MAX")]
    pub rate_limit: u32,

    // Base URL of the geolocation lookup service
    #[arg(long, default_value = "http://ip-api.com", env = "GEO_API_URL")]
    pub geo_url: String,

    // Geolocation cache TTL in seconds
    #[arg(long, default_value_t = 3600, env = "GEO_CACHE_TTL")]
    pub geo_cache_ttl: u64,
}
