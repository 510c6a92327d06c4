//! Outbound request model and the transport seam.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Request body as handed over by the host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Payload {
    #[default]
    Empty,
    Text(String),
    Json(serde_json::Value),
    Bytes(Vec<u8>),
}

impl Payload {
    /// Textual view used for keyword scanning. Binary bodies that are not
    /// UTF-8 have no textual view.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Payload::Empty => None,
            Payload::Text(text) => Some(text.clone()),
            Payload::Json(value) => Some(value.to_string()),
            Payload::Bytes(bytes) => std::str::from_utf8(bytes).ok().map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Empty => true,
            Payload::Text(text) => text.is_empty(),
            Payload::Json(value) => value.is_null(),
            Payload::Bytes(bytes) => bytes.is_empty(),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Json(value)
    }
}

/// One outbound network call, as seen at the interception boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundRequest {
    pub destination: String,
    pub method: String,
    #[serde(default)]
    pub payload: Payload,
    /// Header pairs in their original order.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
}

impl OutboundRequest {
    pub fn new(destination: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            method: method.into(),
            payload: Payload::Empty,
            headers: Vec::new(),
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header value with this name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Host part of the destination for log lines. Falls back to the raw
    /// destination when it is not an absolute URL.
    pub fn host(&self) -> String {
        destination_host(&self.destination)
    }
}

pub fn destination_host(destination: &str) -> String {
    url::Url::parse(destination)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| destination.to_string())
}

/// Response returned to the host, either from the transport or synthesized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Response {
    /// Success reply handed back for intercepted calls.
    pub fn canned_success() -> Self {
        Self {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: r#"{"success":true}"#.to_string(),
        }
    }
}

/// Transport failures reported by the host.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Transport failure: {0}")]
    Other(String),
}

/// The real network, supplied by the host. Only forwarded requests reach it.
pub trait Transport {
    fn send(&mut self, request: OutboundRequest) -> Result<Response, TransportError>;
}
