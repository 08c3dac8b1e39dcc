//! Common test utilities for recurl integration tests
//!
//! This module provides shared test infrastructure including:
//! - A temporary app fixture with its own recurl home
//! - CLI invocation helpers

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

use recurl::config::{ConfigResolver, Settings, APP_MARKER};

/// Exit status codes matching the Rust application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    Error = 1,
}

impl From<i32> for ExitStatus {
    fn from(code: i32) -> Self {
        match code {
            0 => ExitStatus::Success,
            _ => ExitStatus::Error,
        }
    }
}

/// Result of running the CLI
#[derive(Debug)]
pub struct CliResponse {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Exit status code
    pub exit_status: ExitStatus,
    /// Raw exit code
    pub exit_code: i32,
}

impl CliResponse {
    /// Check if stdout contains a substring
    pub fn contains(&self, needle: &str) -> bool {
        self.stdout.contains(needle)
    }

    /// stdout parsed as JSON
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(self.stdout.trim()).ok()
    }
}

/// A temporary app directory plus an isolated recurl home
pub struct MockApp {
    /// Holds both the app and the home directory
    pub dir: TempDir,
    name: String,
    /// Environment variables to set
    pub env_vars: HashMap<String, String>,
}

impl MockApp {
    /// Create `<tmp>/<name>/` with the marker and an empty `endpoints/`
    pub fn new(name: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let root = dir.path().join(name);
        fs::create_dir_all(root.join("endpoints")).expect("Failed to create app dir");
        fs::write(root.join(APP_MARKER), "").expect("Failed to write marker");
        Self { dir, name: name.to_string(), env_vars: HashMap::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join(&self.name)
    }

    /// The isolated recurl home (`RECURL_HOME`)
    pub fn home(&self) -> PathBuf {
        self.dir.path().join("home")
    }

    pub fn settings(&self) -> Settings {
        Settings::with_home(self.home())
    }

    pub fn resolver(&self, env: Option<&str>) -> ConfigResolver {
        ConfigResolver::new(env, self.root(), &self.settings())
    }

    /// Set an environment variable for CLI runs
    pub fn set_env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env_vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn write_global(&self, yaml: &str) -> &Self {
        write(&self.home().join("config.yaml"), yaml);
        self
    }

    pub fn write_default(&self, yaml: &str) -> &Self {
        self.write_env_layer("default", yaml)
    }

    pub fn write_env_layer(&self, env: &str, yaml: &str) -> &Self {
        write(&self.root().join(format!("{}.{}.yaml", self.name, env)), yaml);
        self
    }

    pub fn write_endpoint(&self, name: &str, yaml: &str) -> &Self {
        write(&self.root().join("endpoints").join(format!("{}.yaml", name)), yaml);
        self
    }

    /// Install an executable hook script under `hooks/`
    #[cfg(unix)]
    pub fn write_hook(&self, point: &str, script: &str) -> &Self {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root().join("hooks").join(point);
        write(&path, &format!("#!/bin/sh\n{}\n", script));
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("Failed to chmod hook");
        self
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// Run the CLI from inside the app root
pub fn recurl(app: &MockApp, args: &[&str]) -> CliResponse {
    recurl_in(&app.root(), &app.home(), &app.env_vars, args)
}

/// Run the CLI from `cwd` with the given recurl home
pub fn recurl_in(cwd: &Path, home: &Path, env_vars: &HashMap<String, String>, args: &[&str]) -> CliResponse {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_recurl"));
    cmd.args(args);
    cmd.current_dir(cwd);

    // Set up environment
    cmd.env("RECURL_HOME", home);
    cmd.env_remove("RECURL_LOG");
    cmd.env("NO_COLOR", "1");
    for (key, value) in env_vars {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().expect("Failed to execute command");
    parse_output(output)
}

fn parse_output(output: Output) -> CliResponse {
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(1);

    CliResponse {
        stdout,
        stderr,
        exit_status: ExitStatus::from(exit_code),
        exit_code,
    }
}
