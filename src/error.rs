use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Too many requests, slow down!")]
    RateLimited,

    #[error("page_url is required")]
    MissingPageUrl,

    #[error("event queue closed")]
    QueueClosed,

    #[error("persistence worker did not respond")]
    WorkerUnavailable,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            AppError::MissingPageUrl => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::QueueClosed | AppError::WorkerUnavailable | AppError::Store(_) => {
                // internal detail goes to the log, not to the client
                error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
