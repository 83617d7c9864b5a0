use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::store::StoreError;

// Ingestion request body
#[derive(Deserialize, Clone)]
pub struct TrackRequest {
    #[serde(default)]
    pub page_url: String,
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

// A fully enriched page view, as handed to the event store
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PageView {
    pub page_url: String,
    pub referrer: String,
    pub user_agent: String,
    pub ip_address: String,
    pub country: String,
    pub city: String,
    pub timestamp: DateTime<Utc>,
}

// Aggregate row returned by the analytics endpoint
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PageViewStats {
    pub page_url: String,
    pub views: u64,
}

// Queued event - holds the view + channel to ack persistence back to the handler
pub struct RecordedEvent {
    pub view: PageView,
    pub response_tx: oneshot::Sender<Result<(), StoreError>>,
}
