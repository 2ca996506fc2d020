//! Outbound request bodies.

use crate::models::{value_to_string, ContentType};
use reqwest::multipart::Form;
use reqwest::RequestBuilder;
use serde_json::Value;
use url::form_urlencoded;

/// A POST body, already shaped for its content type.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Form(Vec<(String, String)>),
    Multipart(Vec<(String, String)>),
    Raw(String),
}

impl Payload {
    pub fn encode(content_type: &ContentType, data: Value) -> Self {
        match content_type {
            ContentType::Json => Payload::Json(data),
            ContentType::FormUrlEncoded => Payload::Form(fields(&data)),
            ContentType::Multipart => Payload::Multipart(fields(&data)),
            ContentType::Other(_) => match data {
                Value::String(text) => Payload::Raw(text),
                other => Payload::Raw(other.to_string()),
            },
        }
    }

    /// Body bytes for the non-multipart variants.
    pub fn to_body(&self) -> Option<String> {
        match self {
            Payload::Json(value) => Some(value.to_string()),
            Payload::Form(pairs) => Some(
                form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs)
                    .finish(),
            ),
            Payload::Raw(text) => Some(text.clone()),
            Payload::Multipart(_) => None,
        }
    }

    pub fn apply(self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Payload::Multipart(pairs) => {
                let form = pairs
                    .into_iter()
                    .fold(Form::new(), |form, (name, value)| form.text(name, value));
                builder.multipart(form)
            }
            other => match other.to_body() {
                Some(body) => builder.body(body),
                None => builder,
            },
        }
    }
}

/// Top-level keys of an object payload. Anything else has no fields.
fn fields(data: &Value) -> Vec<(String, String)> {
    match data {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| (key.clone(), value_to_string(value)))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_payload_is_serialized() {
        let payload = Payload::encode(&ContentType::Json, json!({"a": 1, "b": [true]}));
        assert_eq!(payload.to_body().unwrap(), r#"{"a":1,"b":[true]}"#);
    }

    #[test]
    fn form_payload_flattens_top_level_keys() {
        let payload = Payload::encode(&ContentType::FormUrlEncoded, json!({"a": 1}));
        assert_eq!(payload.to_body().unwrap(), "a=1");

        let payload = Payload::encode(
            &ContentType::FormUrlEncoded,
            json!({"name": "a b", "n": null, "list": [1, 2]}),
        );
        assert_eq!(payload.to_body().unwrap(), "name=a+b&n=null&list=1%2C2");
    }

    #[test]
    fn form_payload_of_non_object_is_empty() {
        let payload = Payload::encode(&ContentType::FormUrlEncoded, json!("raw"));
        assert_eq!(payload, Payload::Form(vec![]));
        assert_eq!(payload.to_body().unwrap(), "");
    }

    #[test]
    fn multipart_payload_has_one_field_per_key() {
        let payload = Payload::encode(&ContentType::Multipart, json!({"a": 1, "b": "two"}));
        assert_eq!(
            payload,
            Payload::Multipart(vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "two".to_string()),
            ])
        );
        assert!(payload.to_body().is_none());
    }

    #[test]
    fn other_content_type_passes_text_through() {
        let xml = ContentType::from("application/xml");
        let payload = Payload::encode(&xml, json!("<a>1</a>"));
        assert_eq!(payload.to_body().unwrap(), "<a>1</a>");

        let payload = Payload::encode(&xml, json!({"a": 1}));
        assert_eq!(payload.to_body().unwrap(), r#"{"a":1}"#);
    }
}
