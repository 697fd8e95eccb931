//! API error types and response formatting.
//!
//! Every error body has the shape `{"success": false, "errors": [...]}`.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// API error type that converts to appropriate HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Authentication failed (missing or invalid token).
    #[error("unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request body could not be read.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Submitted data failed validation.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Internal server error (storage, etc.).
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body.
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    success: bool,
    errors: Vec<String>,
}

impl From<tessera_core::Error> for ApiError {
    fn from(err: tessera_core::Error) -> Self {
        match err {
            tessera_core::Error::Validation(messages) => Self::Validation(messages),
            tessera_core::Error::NotFound(what) => Self::NotFound(what),
            other => Self::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, errors) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, vec!["Unauthorized".to_string()]),
            Self::NotFound(what) => (StatusCode::NOT_FOUND, vec![format!("Not found: {what}")]),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, vec![msg]),
            Self::Validation(messages) => (StatusCode::BAD_REQUEST, messages),
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec!["An internal error occurred".to_string()],
                )
            }
        };

        let body = ErrorResponse {
            success: false,
            errors,
        };

        (status, Json(body)).into_response()
    }
}
