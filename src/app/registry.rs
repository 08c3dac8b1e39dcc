//! Registry of known apps
//!
//! The registry maps app names to their root directories. The resolver never
//! touches it directly; callers look an app up and pass its root along.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::{RecurlError, Result};

/// A registered app
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub name: String,
    pub path: PathBuf,
    /// ISO-8601 local timestamp, seconds precision
    pub created: String,
}

/// Repository of registered apps
pub trait AppRegistry {
    /// Root directory of a registered app
    fn lookup(&self, name: &str) -> Result<Option<PathBuf>>;

    /// Register an app, replacing the path of an existing entry with the same name
    fn register(&mut self, name: &str, path: &Path) -> Result<()>;

    /// All entries in registration order
    fn list(&self) -> Result<Vec<RegistryEntry>>;
}

/// On-disk file format
#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    projects: Vec<RegistryEntry>,
}

/// Registry stored as a YAML document
#[derive(Debug, Clone)]
pub struct YamlRegistry {
    path: PathBuf,
}

impl YamlRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<RegistryFile> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(RegistryFile::default()),
            Err(e) => {
                return Err(RecurlError::Registry(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if content.trim().is_empty() {
            return Ok(RegistryFile::default());
        }

        serde_yaml::from_str(&content).map_err(|e| {
            RecurlError::Registry(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    /// Write via a temp file in the same directory, then rename
    fn save(&self, file: &RegistryFile) -> Result<()> {
        let parent = self.path.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(parent).map_err(|e| {
            RecurlError::Registry(format!("Failed to create registry directory: {}", e))
        })?;

        let content = serde_yaml::to_string(file)
            .map_err(|e| RecurlError::Registry(format!("Failed to serialize registry: {}", e)))?;

        let mut temp = NamedTempFile::new_in(parent)
            .map_err(|e| RecurlError::Registry(format!("Failed to create temp file: {}", e)))?;

        temp.write_all(content.as_bytes())
            .map_err(|e| RecurlError::Registry(format!("Failed to write registry: {}", e)))?;

        temp.persist(&self.path)
            .map_err(|e| RecurlError::Registry(format!("Failed to save registry: {}", e)))?;

        Ok(())
    }
}

impl AppRegistry for YamlRegistry {
    fn lookup(&self, name: &str) -> Result<Option<PathBuf>> {
        Ok(self
            .load()?
            .projects
            .into_iter()
            .find(|p| p.name == name)
            .map(|p| p.path))
    }

    fn register(&mut self, name: &str, path: &Path) -> Result<()> {
        let mut file = self.load()?;

        match file.projects.iter_mut().find(|p| p.name == name) {
            Some(existing) if existing.path == path => return Ok(()),
            Some(existing) => existing.path = path.to_path_buf(),
            None => file.projects.push(RegistryEntry {
                name: name.to_string(),
                path: path.to_path_buf(),
                created: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            }),
        }

        debug!(name, path = %path.display(), "App registered");
        self.save(&file)
    }

    fn list(&self) -> Result<Vec<RegistryEntry>> {
        Ok(self.load()?.projects)
    }
}
