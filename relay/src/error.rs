//! Error types and result alias for the relay.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// Target is not an absolute http(s) URL. Raised before any network call.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// No response headers arrived in time; the request was cancelled.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream declared a JSON body but sent something else.
    #[error("failed to decode JSON response: {0}")]
    Decode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RelayError>;
