use crate::error::{RelayError, Result};
use crate::identity;
use crate::models::{ContentType, ForwardRequest, ForwardResult, Method};
use crate::payload::Payload;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Forwards requests to arbitrary targets over a shared connection pool.
#[derive(Debug, Clone)]
pub struct Relay {
    http_client: Client,
    default_timeout_ms: u64,
}

impl Default for Relay {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl Relay {
    pub fn new(http_client: Client) -> Self {
        Self {
            http_client,
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Timeout used when a request does not carry its own.
    pub fn with_default_timeout(mut self, timeout_ms: u64) -> Self {
        self.default_timeout_ms = timeout_ms;
        self
    }

    pub fn default_timeout_ms(&self) -> u64 {
        self.default_timeout_ms
    }

    /// Issues exactly one outbound request and decodes the response body.
    ///
    /// The timeout only covers the wait for response headers. When it
    /// fires the send future is dropped, which cancels the request.
    pub async fn forward(&self, request: ForwardRequest, method: Method) -> Result<ForwardResult> {
        let request_id = Uuid::new_v4();
        let url = request.outbound_url()?;
        let timeout_ms = request.timeout_ms.unwrap_or(self.default_timeout_ms);
        let user_agent = identity::generate_random(&mut rand::thread_rng());

        info!(
            %request_id,
            %method,
            %url,
            timeout_ms,
            "Forwarding request"
        );

        let request_builder = match method {
            Method::Get => self
                .http_client
                .get(url)
                .headers(outbound_headers(user_agent, None, &request.headers)),
            Method::Post => {
                let content_type = request.content_type.unwrap_or_default();
                let headers = outbound_headers(user_agent, Some(&content_type), &request.headers);
                let data = request.data.unwrap_or_else(|| json!({}));
                Payload::encode(&content_type, data)
                    .apply(self.http_client.post(url).headers(headers))
            }
        };

        let send = request_builder.send();
        let response = match tokio::time::timeout(Duration::from_millis(timeout_ms), send).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_timeout() => {
                warn!(%request_id, timeout_ms, "Request timed out");
                return Err(RelayError::Timeout { timeout_ms });
            }
            Ok(Err(e)) => {
                error!(%request_id, "Failed to send request: {:?}", e);
                return Err(RelayError::Network(e));
            }
            Err(_) => {
                warn!(%request_id, timeout_ms, "Request timed out");
                return Err(RelayError::Timeout { timeout_ms });
            }
        };

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = response.text().await.map_err(|e| {
            error!(%request_id, "Failed to read response body: {:?}", e);
            RelayError::Network(e)
        })?;

        info!(
            %request_id,
            status = status.as_u16(),
            content_type = content_type.as_deref().unwrap_or(""),
            "Received response"
        );

        ForwardResult::decode(content_type.as_deref(), body)
    }
}

/// Builds the outbound header set.
///
/// The generated user agent goes in first, then the content type for
/// POSTs, then every caller header replaces whatever shares its name
/// (names are case-insensitive). Multipart bodies drop `Content-Type` so
/// the client can write one carrying the boundary.
pub fn outbound_headers(
    user_agent: String,
    content_type: Option<&ContentType>,
    caller_headers: &HashMap<String, String>,
) -> HeaderMap {
    let mut headers = HeaderMap::new();

    match HeaderValue::from_str(&user_agent) {
        Ok(value) => {
            headers.insert(USER_AGENT, value);
        }
        Err(_) => warn!("Generated user agent is not a valid header value: {}", user_agent),
    }

    if let Some(content_type) = content_type {
        match HeaderValue::from_str(content_type.as_str()) {
            Ok(value) => {
                headers.insert(CONTENT_TYPE, value);
            }
            Err(_) => warn!(
                "Skipping invalid content type '{}'",
                content_type.as_str()
            ),
        }
    }

    for (key, value) in caller_headers {
        let name = match HeaderName::from_bytes(key.as_bytes()) {
            Ok(name) => name,
            Err(_) => {
                warn!("Skipping invalid header name '{}'", key);
                continue;
            }
        };
        match HeaderValue::from_str(value) {
            Ok(value) => {
                headers.insert(name, value);
            }
            Err(_) => warn!("Skipping invalid header value for key '{}': {}", key, value),
        }
    }

    if content_type == Some(&ContentType::Multipart) {
        headers.remove(CONTENT_TYPE);
    }

    headers
}
