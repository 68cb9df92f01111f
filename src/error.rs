use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced over the HTTP API.
///
/// Operations that reference an id no longer in the chapter list are
/// silent no-ops, not errors; only the file library and the import
/// round trip can fail.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0} is required")]
    MissingParameter(&'static str),

    #[error("{0}")]
    ResourceUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            ApiError::ResourceUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(status = %status, error = %self, "request failed");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
