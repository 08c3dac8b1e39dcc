//! Immutable, fully specified HTTP request

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Header map: case-sensitive names in insertion order, last writer wins
pub type Headers = IndexMap<String, String>;

/// Request body variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    /// UTF-8 text (JSON bodies are serialized to this)
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Text(text) => text.as_bytes(),
            Body::Bytes(bytes) => bytes,
        }
    }

    /// Body as text; invalid UTF-8 is replaced
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Body::Text(text) => Cow::Borrowed(text),
            Body::Bytes(bytes) => String::from_utf8_lossy(bytes),
        }
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(bytes)
    }
}

/// Request ready for rendering or transport.
///
/// Fields are private; the only way to change a request is to build a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDescriptor")]
pub struct RequestDescriptor {
    method: String,
    url: String,
    headers: Headers,
    body: Option<Body>,
}

/// Wire form accepted from hooks, normalized through [`RequestDescriptor::new`]
#[derive(Deserialize)]
struct RawDescriptor {
    method: String,
    url: String,
    #[serde(default)]
    headers: Headers,
    #[serde(default)]
    body: Option<Body>,
}

impl From<RawDescriptor> for RequestDescriptor {
    fn from(raw: RawDescriptor) -> Self {
        RequestDescriptor::new(raw.method, raw.url, raw.headers, raw.body)
    }
}

impl RequestDescriptor {
    /// Create a descriptor; the method is uppercased
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        headers: Headers,
        body: Option<Body>,
    ) -> Self {
        Self {
            method: method.into().to_uppercase(),
            url: url.into(),
            headers,
            body,
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Look up a header by its exact (case-sensitive) name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }
}
