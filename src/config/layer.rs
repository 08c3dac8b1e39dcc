//! Layer loading
//!
//! Every layer is a YAML document whose root must be a mapping. Documents are
//! converted into the closed [`serde_json::Value`] model so the merger can
//! match exhaustively on shape. Key order from the document is preserved.

use serde_json::{Number, Value};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

use crate::errors::{RecurlError, Result};

/// A configuration layer: ordered string keys to nested values
pub type Mapping = serde_json::Map<String, Value>;

/// The four layers of a resolution, lowest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerName {
    Global,
    AppDefault,
    AppEnv,
    Endpoint,
}

impl LayerName {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerName::Global => "global",
            LayerName::AppDefault => "app-default",
            LayerName::AppEnv => "app-env",
            LayerName::Endpoint => "endpoint",
        }
    }

    /// All layers in precedence order
    pub fn all() -> [LayerName; 4] {
        [LayerName::Global, LayerName::AppDefault, LayerName::AppEnv, LayerName::Endpoint]
    }
}

/// Load an optional layer; a missing file is an empty mapping
pub fn load_layer(path: &Path) -> Result<Mapping> {
    match fs::read_to_string(path) {
        Ok(content) => {
            debug!(path = %path.display(), "Layer loaded");
            parse_layer(&content, path)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Layer absent, using empty mapping");
            Ok(Mapping::new())
        }
        Err(source) => Err(RecurlError::ReadLayer { path: path.to_path_buf(), source }),
    }
}

/// Load a layer that must exist on disk
pub fn load_required_layer(path: &Path) -> Result<Mapping> {
    match fs::read_to_string(path) {
        Ok(content) => parse_layer(&content, path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(RecurlError::EndpointNotFound(path.to_path_buf()))
        }
        Err(source) => Err(RecurlError::ReadLayer { path: path.to_path_buf(), source }),
    }
}

/// Parse document text. `path` is only used for error reporting.
pub fn parse_layer(content: &str, path: &Path) -> Result<Mapping> {
    let document: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| {
        RecurlError::InvalidDocument { path: path.to_path_buf(), reason: e.to_string() }
    })?;

    match from_yaml(document) {
        // Empty or comment-only document
        Value::Null => Ok(Mapping::new()),
        Value::Object(map) => Ok(map),
        other => Err(RecurlError::InvalidDocument {
            path: path.to_path_buf(),
            reason: format!("root must be a mapping, found {}", shape_name(&other)),
        }),
    }
}

/// Convert a YAML value into the closed value model
pub fn from_yaml(value: serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => from_yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(seq.into_iter().map(from_yaml).collect()),
        serde_yaml::Value::Mapping(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (key_to_string(k), from_yaml(v)))
                .collect(),
        ),
        serde_yaml::Value::Tagged(tagged) => from_yaml(tagged.value),
    }
}

fn from_yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else {
        // .nan and .inf have no JSON representation
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(n.to_string()))
    }
}

fn key_to_string(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Tagged(tagged) => key_to_string(tagged.value),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Human-readable name of a value's shape
pub fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
