use crate::error::{RelayError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use url::Url;

pub const JSON: &str = "application/json";
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a POST payload is encoded. Unknown values are carried verbatim and
/// sent as the `Content-Type` header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum ContentType {
    #[default]
    Json,
    FormUrlEncoded,
    Multipart,
    Other(String),
}

impl ContentType {
    pub fn as_str(&self) -> &str {
        match self {
            ContentType::Json => JSON,
            ContentType::FormUrlEncoded => FORM_URLENCODED,
            ContentType::Multipart => MULTIPART_FORM_DATA,
            ContentType::Other(value) => value,
        }
    }
}

impl From<String> for ContentType {
    fn from(value: String) -> Self {
        match value.as_str() {
            JSON => ContentType::Json,
            FORM_URLENCODED => ContentType::FormUrlEncoded,
            MULTIPART_FORM_DATA => ContentType::Multipart,
            _ => ContentType::Other(value),
        }
    }
}

impl From<&str> for ContentType {
    fn from(value: &str) -> Self {
        ContentType::from(value.to_string())
    }
}

/// Everything needed to issue one relayed request.
#[derive(Debug, Clone, Default)]
pub struct ForwardRequest {
    pub url: String,
    /// Merged into the target's query string in insertion order.
    pub params: Map<String, Value>,
    pub headers: HashMap<String, String>,
    pub data: Option<Value>,
    pub content_type: Option<ContentType>,
    pub timeout_ms: Option<u64>,
}

impl ForwardRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn content_type(mut self, content_type: impl Into<ContentType>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Parses the target and appends the non-null parameters.
    ///
    /// With no parameter to append the URL is returned exactly as parsed,
    /// without an empty `?` tacked on.
    pub fn outbound_url(&self) -> Result<Url> {
        let mut url = Url::parse(&self.url).map_err(|e| RelayError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(RelayError::InvalidUrl {
                url: self.url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let pairs: Vec<(&str, String)> = self
            .params
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.as_str(), value_to_string(value)))
            .collect();

        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }
}

/// String form of a JSON value as it goes into a query string or form field.
///
/// Strings are used verbatim, arrays are joined with commas and objects are
/// written as JSON text.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_to_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Decoded upstream body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ForwardResult {
    Json(Value),
    Text(String),
}

impl ForwardResult {
    /// Picks a representation from the upstream `Content-Type`.
    ///
    /// Undeclared or unknown types get a JSON attempt and fall back to the
    /// raw text.
    pub fn decode(content_type: Option<&str>, body: String) -> Result<Self> {
        let content_type = content_type.unwrap_or_default();
        if content_type.contains(JSON) {
            return serde_json::from_str(&body)
                .map(ForwardResult::Json)
                .map_err(RelayError::Decode);
        }
        if content_type.contains("text/") {
            return Ok(ForwardResult::Text(body));
        }
        match serde_json::from_str(&body) {
            Ok(value) => Ok(ForwardResult::Json(value)),
            Err(_) => Ok(ForwardResult::Text(body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_params_leave_url_untouched() {
        for raw in [
            "https://example.com/",
            "https://example.com/path?x=1",
            "http://127.0.0.1:8080/a/b?c=d&e=f#frag",
        ] {
            let url = ForwardRequest::new(raw).outbound_url().unwrap();
            assert_eq!(url.as_str(), raw);
        }
    }

    #[test]
    fn null_only_params_leave_url_untouched() {
        let url = ForwardRequest::new("https://example.com/x")
            .param("skip", Value::Null)
            .outbound_url()
            .unwrap();
        assert_eq!(url.as_str(), "https://example.com/x");
    }

    #[test]
    fn params_are_appended_once_in_order() {
        let url = ForwardRequest::new("https://example.com/x?keep=1")
            .param("b", "2")
            .param("a", 1)
            .param("gone", Value::Null)
            .param("flag", true)
            .param("empty", "")
            .outbound_url()
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/x?keep=1&b=2&a=1&flag=true&empty="
        );
    }

    #[test]
    fn params_are_url_encoded() {
        let url = ForwardRequest::new("https://example.com/")
            .param("q", "a b&c=d")
            .param("名", "值")
            .outbound_url()
            .unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("q".to_string(), "a b&c=d".to_string()),
                ("名".to_string(), "值".to_string()),
            ]
        );
        assert!(!url.query().unwrap().contains(' '));
    }

    #[test]
    fn relative_or_garbage_urls_are_rejected() {
        for raw in ["/just/a/path", "not a url", "", "example.com"] {
            let err = ForwardRequest::new(raw).outbound_url().unwrap_err();
            assert!(matches!(err, RelayError::InvalidUrl { .. }), "{}", raw);
        }
    }

    #[test]
    fn non_http_schemes_are_rejected() {
        let err = ForwardRequest::new("ftp://example.com/file")
            .outbound_url()
            .unwrap_err();
        assert!(matches!(err, RelayError::InvalidUrl { .. }));
    }

    #[test]
    fn value_to_string_coercions() {
        assert_eq!(value_to_string(&json!("x")), "x");
        assert_eq!(value_to_string(&json!(1.5)), "1.5");
        assert_eq!(value_to_string(&json!(false)), "false");
        assert_eq!(value_to_string(&json!(null)), "null");
        assert_eq!(value_to_string(&json!([1, null, "a"])), "1,,a");
        assert_eq!(value_to_string(&json!({"k": 1})), r#"{"k":1}"#);
    }

    #[test]
    fn content_type_parsing() {
        assert_eq!(ContentType::from("application/json"), ContentType::Json);
        assert_eq!(
            ContentType::from("application/x-www-form-urlencoded"),
            ContentType::FormUrlEncoded
        );
        assert_eq!(ContentType::from("multipart/form-data"), ContentType::Multipart);
        assert_eq!(
            ContentType::from("text/plain"),
            ContentType::Other("text/plain".to_string())
        );
        assert_eq!(ContentType::default().as_str(), "application/json");

        let parsed: ContentType = serde_json::from_value(json!("multipart/form-data")).unwrap();
        assert_eq!(parsed, ContentType::Multipart);
    }

    #[test]
    fn decode_declared_json() {
        let result =
            ForwardResult::decode(Some("application/json; charset=utf-8"), r#"{"a":1}"#.into())
                .unwrap();
        assert_eq!(result, ForwardResult::Json(json!({"a": 1})));
    }

    #[test]
    fn decode_declared_json_with_bad_body_fails() {
        let err = ForwardResult::decode(Some("application/json"), "nope".into()).unwrap_err();
        assert!(matches!(err, RelayError::Decode(_)));
    }

    #[test]
    fn decode_text_keeps_json_looking_body_as_text() {
        let result = ForwardResult::decode(Some("text/plain"), r#"{"a":1}"#.into()).unwrap();
        assert_eq!(result, ForwardResult::Text(r#"{"a":1}"#.to_string()));
    }

    #[test]
    fn decode_unknown_type_tries_json_then_text() {
        let json = ForwardResult::decode(Some("application/octet-stream"), "[1,2]".into()).unwrap();
        assert_eq!(json, ForwardResult::Json(json!([1, 2])));

        let text = ForwardResult::decode(None, "plain words".into()).unwrap();
        assert_eq!(text, ForwardResult::Text("plain words".to_string()));
    }

    #[test]
    fn result_serializes_untagged() {
        let text = serde_json::to_value(ForwardResult::Text("hi".into())).unwrap();
        assert_eq!(text, json!("hi"));
        let json = serde_json::to_value(ForwardResult::Json(json!({"a": [1]}))).unwrap();
        assert_eq!(json, json!({"a": [1]}));
    }
}
