use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::error::AppError;
use crate::models::PageViewStats;
use crate::state::AppState;

// Aggregate listing - views per page, most viewed first. Not rate limited.
pub async fn analytics_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PageViewStats>>, AppError> {
    let stats = state.store.top_pages().await?;
    Ok(Json(stats))
}
