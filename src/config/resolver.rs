//! Four-layer configuration resolution
//!
//! A resolution loads, in order of increasing precedence:
//!
//! 1. `global` - `<recurl home>/config.yaml`
//! 2. `app-default` - `<app-root>/<app>.default.yaml`
//! 3. `app-env` - `<app-root>/<app>.<env>.yaml`, never read for the default env
//! 4. `endpoint` - `<app-root>/endpoints/<name>.yaml`, required
//!
//! Nothing is cached between resolutions; every call rereads the files.

use once_cell::unsync::OnceCell;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use super::layer::{load_layer, load_required_layer, LayerName, Mapping};
use super::merge::merge;
use super::settings::{Settings, DEFAULT_ENV, ENDPOINTS_DIR, LAYER_EXTENSION};
use crate::errors::{RecurlError, Result};

/// The four raw layers of one resolution plus their memoized merge
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    global: Mapping,
    app_default: Mapping,
    app_env: Mapping,
    endpoint: Mapping,
    merged: OnceCell<Mapping>,
}

impl ResolvedConfig {
    pub fn new(global: Mapping, app_default: Mapping, app_env: Mapping, endpoint: Mapping) -> Self {
        Self { global, app_default, app_env, endpoint, merged: OnceCell::new() }
    }

    /// A raw layer as loaded from disk
    pub fn layer(&self, name: LayerName) -> &Mapping {
        match name {
            LayerName::Global => &self.global,
            LayerName::AppDefault => &self.app_default,
            LayerName::AppEnv => &self.app_env,
            LayerName::Endpoint => &self.endpoint,
        }
    }

    /// All layers, lowest precedence first
    pub fn layers(&self) -> [&Mapping; 4] {
        [&self.global, &self.app_default, &self.app_env, &self.endpoint]
    }

    /// The merged view, computed on first access
    pub fn merged(&self) -> &Mapping {
        self.merged.get_or_init(|| merge(self.layers()))
    }
}

/// Loads the layers for one app and environment
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    env: String,
    app_root: PathBuf,
    app_name: String,
    global_config: PathBuf,
}

impl ConfigResolver {
    /// `env` of `None` selects the default environment
    pub fn new(env: Option<&str>, app_root: impl Into<PathBuf>, settings: &Settings) -> Self {
        let app_root = app_root.into();
        let app_name = app_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            env: env.filter(|e| !e.is_empty()).unwrap_or(DEFAULT_ENV).to_string(),
            app_root,
            app_name,
            global_config: settings.global_config(),
        }
    }

    pub fn env(&self) -> &str {
        &self.env
    }

    pub fn app_root(&self) -> &Path {
        &self.app_root
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn global_config_path(&self) -> &Path {
        &self.global_config
    }

    pub fn app_default_path(&self) -> PathBuf {
        self.app_root.join(format!("{}.{}.{}", self.app_name, DEFAULT_ENV, LAYER_EXTENSION))
    }

    /// `None` for the default environment, whose layer is skipped
    pub fn app_env_path(&self) -> Option<PathBuf> {
        if self.env == DEFAULT_ENV {
            return None;
        }
        Some(self.app_root.join(format!("{}.{}.{}", self.app_name, self.env, LAYER_EXTENSION)))
    }

    /// Locate the document for a named endpoint.
    ///
    /// `-` and `_` are interchangeable in names; the dashed file is tried first.
    pub fn endpoint_path(&self, name: &str) -> Result<PathBuf> {
        validate_name("endpoint", name)?;

        let dir = self.app_root.join(ENDPOINTS_DIR);
        let dashed = dir.join(format!("{}.{}", name.replace('_', "-"), LAYER_EXTENSION));
        if dashed.is_file() {
            return Ok(dashed);
        }
        let underscored = dir.join(format!("{}.{}", name.replace('-', "_"), LAYER_EXTENSION));
        if underscored.is_file() {
            return Ok(underscored);
        }
        Err(RecurlError::EndpointNotFound(dir.join(format!("{}.{}", name, LAYER_EXTENSION))))
    }

    /// Resolve a named endpoint
    pub fn resolve_endpoint(&self, name: &str) -> Result<ResolvedConfig> {
        let path = self.endpoint_path(name)?;
        self.resolve(&path)
    }

    /// Load all four layers for an endpoint document
    pub fn resolve(&self, endpoint_file: &Path) -> Result<ResolvedConfig> {
        if !endpoint_file.is_file() {
            return Err(RecurlError::EndpointNotFound(endpoint_file.to_path_buf()));
        }
        validate_name("environment", &self.env)?;

        debug!(
            env = %self.env,
            app_root = %self.app_root.display(),
            endpoint = %endpoint_file.display(),
            "Resolving configuration"
        );

        let global = load_layer(&self.global_config)?;
        let app_default = load_layer(&self.app_default_path())?;
        let app_env = match self.app_env_path() {
            Some(path) => load_layer(&path)?,
            None => Mapping::new(),
        };
        let endpoint = load_required_layer(endpoint_file)?;

        Ok(ResolvedConfig::new(global, app_default, app_env, endpoint))
    }
}

/// Names are joined into file paths, so they must be a single plain component
fn validate_name(what: &str, name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if name.is_empty() || !single_normal || name.contains(['/', '\\']) {
        return Err(RecurlError::Argument(format!("Invalid {} name: {:?}", what, name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn app(name: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join(name);
        fs::create_dir_all(root.join(ENDPOINTS_DIR)).unwrap();
        (dir, root)
    }

    #[test]
    fn test_default_env_has_no_env_layer() {
        let resolver = ConfigResolver::new(None, "/apps/demo", &Settings::with_home("/h"));
        assert_eq!(resolver.env(), "default");
        assert_eq!(resolver.app_env_path(), None);
        assert_eq!(resolver.app_default_path(), PathBuf::from("/apps/demo/demo.default.yaml"));

        let resolver = ConfigResolver::new(Some("default"), "/apps/demo", &Settings::with_home("/h"));
        assert_eq!(resolver.app_env_path(), None);
    }

    #[test]
    fn test_named_env_path() {
        let resolver = ConfigResolver::new(Some("prod"), "/apps/demo", &Settings::with_home("/h"));
        assert_eq!(resolver.app_env_path(), Some(PathBuf::from("/apps/demo/demo.prod.yaml")));
        assert_eq!(resolver.global_config_path(), Path::new("/h/config.yaml"));
    }

    #[test]
    fn test_endpoint_name_dash_underscore() {
        let (_dir, root) = app("demo");
        fs::write(root.join("endpoints/get-user.yaml"), "endpoint: {path: /u}\n").unwrap();
        fs::write(root.join("endpoints/list_all.yaml"), "endpoint: {path: /l}\n").unwrap();
        let resolver = ConfigResolver::new(None, &root, &Settings::with_home(root.join("home")));

        assert!(resolver.endpoint_path("get_user").unwrap().ends_with("get-user.yaml"));
        assert!(resolver.endpoint_path("get-user").unwrap().ends_with("get-user.yaml"));
        assert!(resolver.endpoint_path("list-all").unwrap().ends_with("list_all.yaml"));
    }

    #[test]
    fn test_endpoint_name_rejects_paths() {
        let resolver = ConfigResolver::new(None, "/apps/demo", &Settings::with_home("/h"));
        for name in ["../secret", "a/b", "", "..", "."] {
            let err = resolver.endpoint_path(name).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Other, "{name:?}");
        }
    }

    #[test]
    fn test_env_name_rejects_paths() {
        let (_dir, root) = app("demo");
        fs::write(root.join("endpoints/e.yaml"), "endpoint: {path: /x}\n").unwrap();
        for env in ["../../x", "a/b", ".."] {
            let resolver = ConfigResolver::new(Some(env), &root, &Settings::with_home(root.join("home")));
            let err = resolver.resolve_endpoint("e").unwrap_err();
            assert!(matches!(&err, RecurlError::Argument(msg) if msg.contains("environment")), "{env:?}");
        }
    }

    #[test]
    fn test_missing_endpoint_is_not_found() {
        let (_dir, root) = app("demo");
        let resolver = ConfigResolver::new(None, &root, &Settings::with_home(root.join("home")));
        let err = resolver.resolve_endpoint("nope").unwrap_err();
        assert!(matches!(err, RecurlError::EndpointNotFound(_)));
    }

    #[test]
    fn test_merged_view_is_memoized_and_pure() {
        let (_dir, root) = app("demo");
        fs::write(root.join("demo.default.yaml"), "base_url: http://a\ntimeout: 5\n").unwrap();
        fs::write(root.join("endpoints/e.yaml"), "timeout: 9\nendpoint: {path: /x}\n").unwrap();
        let resolver = ConfigResolver::new(None, &root, &Settings::with_home(root.join("home")));

        let resolved = resolver.resolve_endpoint("e").unwrap();
        let first: *const Mapping = resolved.merged();
        let second: *const Mapping = resolved.merged();
        assert_eq!(first, second);
        assert_eq!(resolved.merged().get("timeout"), Some(&json!(9)));
        assert!(resolved.layer(LayerName::Global).is_empty());

        let again = resolver.resolve_endpoint("e").unwrap();
        assert_eq!(resolved.merged(), again.merged());
    }
}
