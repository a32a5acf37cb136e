use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use biolink_core::error::CoreError;
use serde_json::json;
use thiserror::Error;

/// Failures of the HTTP surface. Each variant renders the body the profile
/// and admin pages expect for that endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Config file not found")]
    ConfigNotFound,
    #[error("Failed to read configuration")]
    ConfigRead(#[source] CoreError),
    #[error("Failed to save configuration")]
    ConfigWrite(#[source] CoreError),
    #[error("Failed to read views")]
    ViewRead(#[source] CoreError),
    #[error("Failed to increment view")]
    ViewIncrement(#[source] CoreError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ConfigNotFound => StatusCode::NOT_FOUND,
            ApiError::ConfigRead(_)
            | ApiError::ConfigWrite(_)
            | ApiError::ViewRead(_)
            | ApiError::ViewIncrement(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        let body = match &self {
            ApiError::ConfigNotFound => json!({ "error": message }),
            ApiError::ConfigRead(err) => {
                tracing::error!("config read failed: {err}");
                json!({ "error": message })
            }
            ApiError::ConfigWrite(err) => {
                tracing::error!("Error saving config: {err}");
                json!({ "success": false, "message": message })
            }
            ApiError::ViewRead(err) => {
                tracing::error!("view count read failed: {err}");
                json!({ "count": 0 })
            }
            ApiError::ViewIncrement(err) => {
                tracing::error!("View Count Error: {err}");
                json!({ "error": message })
            }
        };

        (status, Json(body)).into_response()
    }
}
