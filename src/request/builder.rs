//! Request assembly
//!
//! Turns a merged configuration into a [`RequestDescriptor`]:
//!
//! 1. method from `endpoint.method` (default `GET`), uppercased
//! 2. URL from `base_url` + `endpoint.path`, plus `endpoint.params` as a query
//! 3. headers: top-level `headers`, then `endpoint.headers` on top
//! 4. `Authorization` from `token` or else `basic_auth`, only when absent
//! 5. body from `endpoint.body`; structured bodies become compact JSON

use serde_json::Value as JsonValue;
use tracing::debug;
use url::form_urlencoded;

use super::descriptor::{Body, Headers, RequestDescriptor};
use crate::config::{Mapping, ResolvedConfig};
use crate::errors::{RecurlError, Result};

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Authentication keys, checked in this order; the first present wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    Token,
    BasicAuth,
}

impl AuthScheme {
    pub const PRIORITY: [AuthScheme; 2] = [AuthScheme::Token, AuthScheme::BasicAuth];

    /// Config key holding the credential
    pub fn config_key(&self) -> &'static str {
        match self {
            AuthScheme::Token => "token",
            AuthScheme::BasicAuth => "basic_auth",
        }
    }

    /// `Authorization` header value for a credential, used verbatim
    pub fn header_value(&self, credential: &str) -> String {
        match self {
            AuthScheme::Token => format!("Bearer {}", credential),
            AuthScheme::BasicAuth => format!("Basic {}", credential),
        }
    }
}

/// Build a request from a resolved configuration
pub fn build(resolved: &ResolvedConfig) -> Result<RequestDescriptor> {
    build_from_merged(resolved.merged())
}

/// Build a request from an already merged mapping
pub fn build_from_merged(merged: &Mapping) -> Result<RequestDescriptor> {
    let endpoint = endpoint_section(merged)?;

    let method = match endpoint.get("method") {
        None | Some(JsonValue::Null) => "GET".to_string(),
        Some(JsonValue::String(method)) if is_http_token(method) => method.clone(),
        Some(_) => {
            return Err(RecurlError::InvalidField { field: "endpoint.method", expected: "an HTTP method token" })
        }
    };

    let url = build_url(merged, endpoint)?;

    let mut headers = Headers::new();
    overlay_headers(&mut headers, merged.get("headers"), "headers")?;
    overlay_headers(&mut headers, endpoint.get("headers"), "endpoint.headers")?;

    inject_auth(&mut headers, merged);

    let body = match endpoint.get("body") {
        None | Some(JsonValue::Null) => None,
        Some(structured @ (JsonValue::Object(_) | JsonValue::Array(_))) => {
            headers
                .entry(CONTENT_TYPE.to_string())
                .or_insert_with(|| JSON_CONTENT_TYPE.to_string());
            Some(Body::Text(serde_json::to_string(structured)?))
        }
        Some(value) => Some(Body::Text(scalar_to_string(value))),
    };

    let request = RequestDescriptor::new(method, url, headers, body);
    debug!(method = %request.method(), url = %request.url(), "Request assembled");
    Ok(request)
}

fn endpoint_section(merged: &Mapping) -> Result<&Mapping> {
    match merged.get("endpoint") {
        Some(JsonValue::Object(section)) => Ok(section),
        None | Some(JsonValue::Null) => Err(RecurlError::MissingRequiredField("endpoint.path")),
        Some(_) => Err(RecurlError::InvalidField { field: "endpoint", expected: "a mapping" }),
    }
}

fn required_text<'a>(
    section: &'a Mapping,
    key: &str,
    field: &'static str,
) -> Result<&'a str> {
    match section.get(key) {
        Some(JsonValue::String(text)) if !text.trim().is_empty() => Ok(text.as_str()),
        None | Some(JsonValue::Null) | Some(JsonValue::String(_)) => {
            Err(RecurlError::MissingRequiredField(field))
        }
        Some(_) => Err(RecurlError::InvalidField { field, expected: "text" }),
    }
}

fn build_url(merged: &Mapping, endpoint: &Mapping) -> Result<String> {
    let base_url = required_text(merged, "base_url", "base_url")?;
    let path = match endpoint.get("path") {
        Some(JsonValue::String(path)) => path.as_str(),
        None | Some(JsonValue::Null) => return Err(RecurlError::MissingRequiredField("endpoint.path")),
        Some(_) => return Err(RecurlError::InvalidField { field: "endpoint.path", expected: "text" }),
    };

    let mut url = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );

    if let Some(query) = build_query(endpoint.get("params"))? {
        url.push(if url.contains('?') { '&' } else { '?' });
        url.push_str(&query);
    }

    Ok(url)
}

fn build_query(params: Option<&JsonValue>) -> Result<Option<String>> {
    let params = match params {
        None | Some(JsonValue::Null) => return Ok(None),
        Some(JsonValue::Object(params)) => params,
        Some(_) => {
            return Err(RecurlError::InvalidField { field: "endpoint.params", expected: "a mapping" })
        }
    };

    let mut query = form_urlencoded::Serializer::new(String::new());
    let mut pairs = 0usize;
    for (name, value) in params {
        match value {
            JsonValue::Null => {}
            JsonValue::Array(items) => {
                for item in items.iter().filter(|i| !i.is_null()) {
                    query.append_pair(name, &scalar_to_string(item));
                    pairs += 1;
                }
            }
            other => {
                query.append_pair(name, &scalar_to_string(other));
                pairs += 1;
            }
        }
    }

    Ok((pairs > 0).then(|| query.finish()))
}

fn overlay_headers(headers: &mut Headers, source: Option<&JsonValue>, field: &'static str) -> Result<()> {
    match source {
        None | Some(JsonValue::Null) => Ok(()),
        Some(JsonValue::Object(map)) => {
            for (name, value) in map {
                headers.insert(name.clone(), scalar_to_string(value));
            }
            Ok(())
        }
        Some(_) => Err(RecurlError::InvalidField { field, expected: "a mapping" }),
    }
}

fn inject_auth(headers: &mut Headers, merged: &Mapping) {
    let credential = AuthScheme::PRIORITY.iter().find_map(|scheme| {
        match merged.get(scheme.config_key()) {
            None | Some(JsonValue::Null) => None,
            Some(value) => Some((*scheme, scalar_to_string(value))),
        }
    });

    if let Some((scheme, credential)) = credential {
        if !headers.contains_key(AUTHORIZATION) {
            debug!(scheme = scheme.config_key(), "Injecting Authorization header");
            headers.insert(AUTHORIZATION.to_string(), scheme.header_value(&credential));
        }
    }
}

/// RFC 9110 token: one or more visible characters, no separators
fn is_http_token(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`' | '|' | '~')
        })
}

/// Text form of a config value: strings verbatim, scalars via display,
/// nested values as compact JSON
pub fn scalar_to_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(text) => text.clone(),
        JsonValue::Null => String::new(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}
