//! Sending a prepared request over HTTP
//!
//! The engine only hands a [`RequestDescriptor`] to a [`Transport`]; the
//! reqwest-backed implementation reads its connection options (timeout,
//! verification, client certificates) from the merged configuration.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde_json::Value as JsonValue;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

use super::ssl::SslConfig;
use crate::config::{Mapping, DEFAULT_TIMEOUT};
use crate::errors::{RecurlError, Result};
use crate::request::RequestDescriptor;

pub const USER_AGENT_STRING: &str = concat!("recurl/", env!("CARGO_PKG_VERSION"));

/// Response as seen by the presentation layer
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    /// Canonical reason phrase, empty for unknown codes
    pub reason: String,
    pub elapsed: Duration,
    /// Response headers in received order
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body parsed as JSON, if it is JSON
    pub fn json(&self) -> Option<JsonValue> {
        serde_json::from_slice(&self.body).ok()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Something that can execute a request
pub trait Transport {
    fn send(&self, request: &RequestDescriptor) -> impl Future<Output = Result<TransportResponse>> + Send;
}

/// Connection options read from the merged configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TransportOptions {
    pub timeout: Duration,
    pub ssl: SslConfig,
}

impl TransportOptions {
    pub fn from_config(merged: &Mapping) -> Result<Self> {
        let invalid = || RecurlError::InvalidField {
            field: "timeout",
            expected: "a positive number of seconds",
        };
        let timeout = match merged.get("timeout") {
            None | Some(JsonValue::Null) => Duration::from_secs(DEFAULT_TIMEOUT),
            Some(JsonValue::Number(n)) => match n.as_f64() {
                // Values too large for a Duration are rejected, not clamped
                Some(secs) if secs > 0.0 => Duration::try_from_secs_f64(secs).map_err(|_| invalid())?,
                _ => return Err(invalid()),
            },
            Some(_) => return Err(invalid()),
        };

        Ok(Self { timeout, ssl: SslConfig::from_config(merged)? })
    }
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client; credential files are checked here, before any connection
    pub fn new(options: TransportOptions) -> Result<Self> {
        let builder = Client::builder()
            .user_agent(USER_AGENT_STRING)
            .timeout(options.timeout)
            .redirect(reqwest::redirect::Policy::none());

        let client = options.ssl.apply_to_builder(builder)?.build()?;
        Ok(Self { client })
    }

    pub fn from_config(merged: &Mapping) -> Result<Self> {
        Self::new(TransportOptions::from_config(merged)?)
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<TransportResponse> {
        let method = Method::from_bytes(request.method().as_bytes())
            .map_err(|_| RecurlError::Argument(format!("Invalid HTTP method: {}", request.method())))?;
        let url = Url::parse(request.url())
            .map_err(|e| RecurlError::Argument(format!("Invalid URL '{}': {}", request.url(), e)))?;
        let headers = header_map(request)?;

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = request.body() {
            builder = builder.body(body.as_bytes().to_vec());
        }

        info!(method = request.method(), url = request.url(), "Sending request");
        let start = Instant::now();
        let response = builder.send().await?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect();
        let body = response.bytes().await?.to_vec();
        let elapsed = start.elapsed();

        debug!(status = status.as_u16(), bytes = body.len(), ?elapsed, "Response received");

        Ok(TransportResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            elapsed,
            headers,
            body,
        })
    }
}

fn header_map(request: &RequestDescriptor) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(request.headers().len());
    for (name, value) in request.headers() {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| RecurlError::Argument(format!("Invalid header name: {:?}", name)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| RecurlError::Argument(format!("Invalid value for header {}", name)))?;
        // Names that differ only by case collapse into one multi-valued header
        map.append(header_name, header_value);
    }
    Ok(map)
}
