use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::Deserialize;
use tracing::warn;

use crate::metrics::{GEO_CACHE_HITS, GEO_CACHE_MISSES, GEO_CACHE_SIZE};

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

// Coarse location attached to a page view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoLocation {
    pub country: String,
    pub city: String,
}

impl GeoLocation {
    pub fn unknown() -> Self {
        Self {
            country: "Unknown".to_string(),
            city: "Unknown".to_string(),
        }
    }
}

// Cached lookup result with timestamp
#[derive(Clone)]
struct CachedLocation {
    location: GeoLocation,
    created_at: Instant,
}

// Response shape of the lookup API (ip-api.com style)
#[derive(Deserialize)]
struct GeoResponse {
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

// Client for the external geolocation service. Lookups are cached per IP
// with a TTL; any transport or parse failure degrades to "Unknown" so the
// ingestion path never fails on enrichment.
pub struct GeoClient {
    client: reqwest::Client,
    base_url: String,
    cache: DashMap<String, CachedLocation>,
    ttl: Duration,
}

impl GeoClient {
    pub fn new(base_url: String, ttl: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            cache: DashMap::new(),
            ttl,
        }
    }

    pub async fn lookup(&self, ip: &str) -> GeoLocation {
        // check cache first
        if let Some(entry) = self.cache.get(ip) {
            if entry.created_at.elapsed() < self.ttl {
                GEO_CACHE_HITS.inc();
                return entry.location.clone();
            }
        }
        GEO_CACHE_MISSES.inc();

        let location = match self.fetch(ip).await {
            Ok(location) => location,
            Err(e) => {
                warn!(ip, error = %e, "geolocation lookup failed");
                GeoLocation::unknown()
            }
        };

        // the unknown fallback is cached too, so a dead lookup service is
        // not re-queried on every event from the same client
        self.cache.insert(
            ip.to_string(),
            CachedLocation {
                location: location.clone(),
                created_at: Instant::now(),
            },
        );
        GEO_CACHE_SIZE.set(self.cache.len() as f64);

        location
    }

    async fn fetch(&self, ip: &str) -> Result<GeoLocation, reqwest::Error> {
        let body: GeoResponse = self
            .client
            .get(format!("{}/json/{}", self.base_url, ip))
            .timeout(LOOKUP_TIMEOUT)
            .send()
            .await?
            .json()
            .await?;

        Ok(GeoLocation {
            country: body.country.unwrap_or_else(|| "Unknown".to_string()),
            city: body.city.unwrap_or_else(|| "Unknown".to_string()),
        })
    }
}
