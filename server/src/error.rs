//! Boundary errors and their HTTP rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use relay_core::RelayError;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Error)]
pub enum ApiError {
    /// No target URL was given. Carries an example of a well-formed call.
    #[error("missing url parameter")]
    MissingUrl { usage: Value },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::MissingUrl { usage } => {
                warn!("Rejected request without url");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "missing url parameter",
                        "usage": usage,
                    })),
                )
                    .into_response()
            }
            ApiError::Validation(message) => {
                warn!("Rejected invalid request: {}", message);
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid request",
                        "message": message,
                    })),
                )
                    .into_response()
            }
            ApiError::Relay(e) => {
                error!("Relay failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "request failed",
                        "message": e.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}
