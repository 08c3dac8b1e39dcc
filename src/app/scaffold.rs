//! New app scaffolding
//!
//! ```text
//! <parent>/<name>/
//!   ├─ .recurl
//!   ├─ <name>.default.yaml
//!   └─ endpoints/
//! ```

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::registry::AppRegistry;
use crate::config::settings::{APP_MARKER, DEFAULT_ENV, ENDPOINTS_DIR, LAYER_EXTENSION};
use crate::errors::{RecurlError, Result};

/// Create (or complete) an app directory and register it
pub fn create_app(name: &str, parent: &Path, registry: &mut dyn AppRegistry) -> Result<PathBuf> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(RecurlError::Argument(format!("Invalid app name: {:?}", name)));
    }

    let app_dir = parent.join(name);
    fs::create_dir_all(app_dir.join(ENDPOINTS_DIR))?;

    let marker = app_dir.join(APP_MARKER);
    if !marker.exists() {
        fs::write(&marker, "")?;
    }

    let default_config = app_dir.join(format!("{}.{}.{}", name, DEFAULT_ENV, LAYER_EXTENSION));
    if !default_config.exists() {
        let template = json!({
            "base_url": "https://example.com",
            "headers": {},
            "timeout": 10
        });
        let content = serde_yaml::to_string(&template)
            .map_err(|e| RecurlError::Argument(format!("Failed to render default config: {}", e)))?;
        fs::write(&default_config, content)?;
    }

    let app_dir = app_dir.canonicalize().unwrap_or(app_dir);
    registry.register(name, &app_dir)?;

    info!(name, path = %app_dir.display(), "App initialised");
    Ok(app_dir)
}
