use crate::error::ApiError;
use relay_core::{ContentType, ForwardRequest};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;

/// Body of `POST /relay`: relayed as a GET.
#[derive(Debug, Deserialize)]
pub struct RelayBody {
    pub url: Option<String>,
    pub params: Option<Map<String, Value>>,
    pub headers: Option<HashMap<String, String>>,
    pub timeout: Option<u64>,
}

/// Body of `POST /relay-post`: relayed as a POST carrying `data`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayPostBody {
    pub url: Option<String>,
    pub data: Option<Value>,
    pub params: Option<Map<String, Value>>,
    pub headers: Option<HashMap<String, String>>,
    pub content_type: Option<ContentType>,
    pub timeout: Option<u64>,
}

fn require_url(url: Option<String>, usage: Value) -> Result<String, ApiError> {
    match url {
        Some(url) if !url.is_empty() => Ok(url),
        _ => Err(ApiError::MissingUrl { usage }),
    }
}

impl RelayBody {
    pub fn into_forward_request(self) -> Result<ForwardRequest, ApiError> {
        let usage = json!({
            "url": "https://api.example.com/data",
            "params": { "param1": "value1", "param2": "value2" },
            "headers": { "Authorization": "Bearer token" },
            "timeout": 30000
        });
        Ok(ForwardRequest {
            url: require_url(self.url, usage)?,
            params: self.params.unwrap_or_default(),
            headers: self.headers.unwrap_or_default(),
            data: None,
            content_type: None,
            timeout_ms: self.timeout,
        })
    }
}

impl RelayPostBody {
    pub fn into_forward_request(self) -> Result<ForwardRequest, ApiError> {
        let usage = json!({
            "url": "https://api.example.com/endpoint",
            "data": { "key": "value" },
            "params": { "queryParam": "value" },
            "headers": { "Authorization": "Bearer token" },
            "contentType": "application/json",
            "timeout": 30000
        });
        Ok(ForwardRequest {
            url: require_url(self.url, usage)?,
            params: self.params.unwrap_or_default(),
            headers: self.headers.unwrap_or_default(),
            data: self.data,
            content_type: self.content_type,
            timeout_ms: self.timeout,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct IdentityQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub count: Option<String>,
    pub types: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    pub identity: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct IdentityBatchResponse {
    pub count: usize,
    pub identities: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct IdentityTypesResponse {
    pub types: Vec<&'static str>,
    pub description: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_body_uses_camel_case_content_type() {
        let body: RelayPostBody = serde_json::from_value(json!({
            "url": "https://example.com",
            "data": {"a": 1},
            "contentType": "application/x-www-form-urlencoded",
            "timeout": 1000
        }))
        .unwrap();
        let request = body.into_forward_request().unwrap();
        assert_eq!(request.content_type, Some(ContentType::FormUrlEncoded));
        assert_eq!(request.timeout_ms, Some(1000));
        assert_eq!(request.data, Some(json!({"a": 1})));
    }

    #[test]
    fn params_keep_their_order() {
        let body: RelayBody = serde_json::from_str(
            r#"{"url": "https://example.com", "params": {"z": 1, "a": 2, "m": 3}}"#,
        )
        .unwrap();
        let request = body.into_forward_request().unwrap();
        let keys: Vec<&str> = request.params.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn missing_or_empty_url_is_rejected() {
        for raw in [json!({}), json!({"url": ""}), json!({"url": null})] {
            let body: RelayBody = serde_json::from_value(raw).unwrap();
            assert!(matches!(
                body.into_forward_request(),
                Err(ApiError::MissingUrl { .. })
            ));
        }
    }
}
