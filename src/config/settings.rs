//! Well-known locations and constants

use std::path::{Path, PathBuf};

/// Marker file identifying an app root directory
pub const APP_MARKER: &str = ".recurl";

/// Environment name that skips the per-environment layer
pub const DEFAULT_ENV: &str = "default";

/// Request timeout in seconds when the config sets none
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Subdirectory of an app root holding endpoint documents
pub const ENDPOINTS_DIR: &str = "endpoints";

/// Extension shared by every layer document
pub const LAYER_EXTENSION: &str = "yaml";

/// Overrides the user-wide recurl directory
pub const HOME_ENV_VAR: &str = "RECURL_HOME";

/// User-wide locations (global layer, app registry)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    home: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self { home: Self::default_home() }
    }
}

impl Settings {
    /// Resolve the recurl home from `RECURL_HOME`, falling back to `~/.recurl`
    pub fn from_env() -> Self {
        match std::env::var_os(HOME_ENV_VAR) {
            Some(dir) if !dir.is_empty() => Self::with_home(PathBuf::from(dir)),
            _ => Self::default(),
        }
    }

    /// Use an explicit home directory
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    fn default_home() -> PathBuf {
        dirs::home_dir()
            .map(|p| p.join(APP_MARKER))
            .unwrap_or_else(|| PathBuf::from(APP_MARKER))
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// The single user-wide `global` layer document
    pub fn global_config(&self) -> PathBuf {
        self.home.join("config.yaml")
    }

    /// The app registry document
    pub fn registry_file(&self) -> PathBuf {
        self.home.join("registry.yaml")
    }
}
