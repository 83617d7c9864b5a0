use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::geo::GeoClient;
use crate::models::RecordedEvent;
use crate::store::EventStore;

// Background persistence worker - drains the event queue sequentially,
// enriches each view with geolocation and hands it to the store. The
// handler waits on the oneshot ack; a receiver that gave up is ignored.
pub async fn persist_worker(
    mut rx: mpsc::Receiver<RecordedEvent>,
    geo: GeoClient,
    store: Arc<dyn EventStore>,
) {
    info!("persistence worker started");

    while let Some(event) = rx.recv().await {
        let mut view = event.view;

        let location = geo.lookup(&view.ip_address).await;
        view.country = location.country;
        view.city = location.city;
        view.timestamp = Utc::now();

        let result = store.record(view).await;
        if let Err(e) = &result {
            error!(error = %e, "failed to persist page view");
        }

        let _ = event.response_tx.send(result);
    }

    info!("persistence worker stopped");
}
