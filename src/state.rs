use std::sync::Arc;

use tokio::sync::mpsc;

use crate::models::RecordedEvent;
use crate::rate_limit::RateLimiter;
use crate::store::EventStore;

// App's shared state
pub struct AppState {
    pub limiter: RateLimiter,
    pub store: Arc<dyn EventStore>,
    pub events_tx: mpsc::Sender<RecordedEvent>,
}
