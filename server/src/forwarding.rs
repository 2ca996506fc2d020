use crate::error::ApiError;
use crate::models::{RelayBody, RelayPostBody};
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use bytes::Bytes;
use relay_core::{ForwardRequest, ForwardResult, Method};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Incoming headers passed on by `GET /relay`.
const FORWARDED_HEADERS: &[&str] = &["authorization", "user-agent", "accept", "accept-language"];

/// Query keys `GET /relay` consumes itself instead of forwarding.
const RESERVED_PARAMS: &[&str] = &["url", "timeout"];

const GET_USAGE: &str = "GET /relay?url=https://api.example.com/data&param1=value1&param2=value2";

/// Builds a relayed GET from the incoming query string and headers.
fn request_from_query(
    query: Vec<(String, String)>,
    headers: &HeaderMap,
    default_timeout_ms: u64,
) -> Result<ForwardRequest, ApiError> {
    let first = |key: &str| {
        query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    let url = match first("url") {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => {
            return Err(ApiError::MissingUrl {
                usage: json!(GET_USAGE),
            })
        }
    };

    let timeout_ms = match first("timeout") {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable timeout '{}'", raw);
            default_timeout_ms
        }),
        None => default_timeout_ms,
    };

    let mut params = Map::new();
    for (key, value) in &query {
        if !RESERVED_PARAMS.contains(&key.as_str()) {
            params.insert(key.clone(), Value::String(value.clone()));
        }
    }

    let forwarded: HashMap<String, String> = FORWARDED_HEADERS
        .iter()
        .filter_map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(|v| (name.to_string(), v.to_string()))
        })
        .collect();

    Ok(ForwardRequest {
        url,
        params,
        headers: forwarded,
        timeout_ms: Some(timeout_ms),
        ..Default::default()
    })
}

/// Request bodies are read as JSON regardless of the declared content type.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::Validation(format!("request body is not valid JSON: {}", e)))
}

async fn relay(
    app_state: &AppState,
    request: ForwardRequest,
    method: Method,
) -> Result<Json<ForwardResult>, ApiError> {
    info!("Relaying {} request to {}", method, request.url);
    let result = app_state.relay.forward(request, method).await?;
    Ok(Json(result))
}

#[axum::debug_handler]
pub async fn relay_get_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Result<Json<ForwardResult>, ApiError> {
    let request = request_from_query(query, &headers, app_state.relay.default_timeout_ms())?;
    relay(&app_state, request, Method::Get).await
}

#[axum::debug_handler]
pub async fn relay_body_handler(
    State(app_state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ForwardResult>, ApiError> {
    let request = parse_body::<RelayBody>(&body)?.into_forward_request()?;
    relay(&app_state, request, Method::Get).await
}

#[axum::debug_handler]
pub async fn relay_post_handler(
    State(app_state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ForwardResult>, ApiError> {
    let request = parse_body::<RelayPostBody>(&body)?.into_forward_request()?;
    relay(&app_state, request, Method::Post).await
}

/// Preflight answer for browsers calling `/relay-post` cross-origin.
pub async fn relay_post_options_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
        ],
    )
}
