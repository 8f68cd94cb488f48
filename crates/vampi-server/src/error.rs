//! HTTP error types for the `VAmPI` server.
//!
//! Maps bootstrap errors into JSON responses with a machine-readable
//! `error` field and a human-readable `message`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use vampi_core::error::BootstrapError;

/// Application-level error returned from HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The store could not be reached or was left in an unknown state.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            Self::StoreUnavailable(msg) => {
                tracing::error!(error = %msg, "store operation failed");
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", msg)
            }
        };

        let body = ErrorBody {
            error: error_type,
            message,
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<BootstrapError> for AppError {
    fn from(err: BootstrapError) -> Self {
        match err {
            BootstrapError::StoreUnavailable { .. } => Self::StoreUnavailable(err.to_string()),
        }
    }
}
