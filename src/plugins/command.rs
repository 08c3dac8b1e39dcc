//! Executable hooks
//!
//! An app may ship executables under `<app-root>/hooks/` named after a hook
//! point (`after_config`, `after_prepare`). Each is run with the hook name as
//! its only argument and the current value as JSON on stdin. Empty output or
//! `null` keeps the value; anything else must parse as the replacement.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use tracing::{debug, info};

use super::hooks::{ConfigTransform, HookPipeline, HookPoint, RequestTransform};
use crate::config::Mapping;
use crate::errors::{RecurlError, Result};
use crate::request::RequestDescriptor;

/// Directory of an app root holding hook executables
pub const HOOKS_DIR: &str = "hooks";

/// A hook implemented by an external executable
#[derive(Debug, Clone)]
pub struct CommandHook {
    point: HookPoint,
    program: PathBuf,
}

impl CommandHook {
    pub fn new(point: HookPoint, program: impl Into<PathBuf>) -> Self {
        Self { point, program: program.into() }
    }

    pub fn point(&self) -> HookPoint {
        self.point
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the executable, returning its trimmed stdout
    fn invoke(&self, input: Vec<u8>) -> Result<Option<String>> {
        let hook = self.point.as_str();
        let fail = |message: String| RecurlError::Hook { hook, message };

        debug!(hook, program = %self.program.display(), "Running hook");

        let mut child = Command::new(&self.program)
            .arg(hook)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| fail(format!("failed to execute {}: {}", self.program.display(), e)))?;

        // Feed stdin from its own thread so a hook that streams its output
        // cannot fill the stdout pipe while we are still writing
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || match stdin.write_all(&input) {
                // A hook may exit without reading its input
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
                result => result,
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|e| fail(format!("failed to get hook output: {}", e)))?;

        if let Some(writer) = writer {
            writer
                .join()
                .map_err(|_| fail("stdin writer panicked".to_string()))?
                .map_err(|e| fail(format!("failed to write to hook stdin: {}", e)))?;
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(fail(format!("exited with {}: {}", output.status, stderr.trim())));
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if stdout.is_empty() || stdout == "null" {
            return Ok(None);
        }
        Ok(Some(stdout))
    }
}

impl ConfigTransform for CommandHook {
    fn after_config(&self, merged: &Mapping) -> Result<Option<Mapping>> {
        let input = serde_json::to_vec(merged)?;
        match self.invoke(input)? {
            None => Ok(None),
            Some(stdout) => serde_json::from_str(&stdout).map(Some).map_err(|e| RecurlError::Hook {
                hook: self.point.as_str(),
                message: format!("expected a JSON mapping: {}", e),
            }),
        }
    }
}

impl RequestTransform for CommandHook {
    fn after_prepare(&self, request: &RequestDescriptor) -> Result<Option<RequestDescriptor>> {
        let input = serde_json::to_vec(request)?;
        match self.invoke(input)? {
            None => Ok(None),
            Some(stdout) => serde_json::from_str(&stdout).map(Some).map_err(|e| RecurlError::Hook {
                hook: self.point.as_str(),
                message: format!("expected a request object: {}", e),
            }),
        }
    }
}

/// Register the hook executables found in an app root
pub fn discover(app_root: &Path) -> HookPipeline {
    let mut pipeline = HookPipeline::new();
    let dir = app_root.join(HOOKS_DIR);

    for point in HookPoint::all() {
        let program = dir.join(point.as_str());
        if !program.is_file() {
            continue;
        }
        info!(hook = point.as_str(), program = %program.display(), "Hook registered");
        let hook = CommandHook::new(point, program);
        match point {
            HookPoint::AfterConfig => pipeline.register_config(hook),
            HookPoint::AfterPrepare => pipeline.register_request(hook),
        };
    }

    pipeline
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::request::Headers;
    use serde_json::json;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_empty_output_keeps_value() {
        let dir = TempDir::new().unwrap();
        let hook = CommandHook::new(HookPoint::AfterConfig, script(dir.path(), "h", "cat > /dev/null"));
        assert_eq!(hook.after_config(&Mapping::new()).unwrap(), None);
    }

    #[test]
    fn test_null_output_keeps_value() {
        let dir = TempDir::new().unwrap();
        let hook = CommandHook::new(HookPoint::AfterPrepare, script(dir.path(), "h", "cat > /dev/null; echo null"));
        let req = RequestDescriptor::new("GET", "http://x", Headers::new(), None);
        assert_eq!(hook.after_prepare(&req).unwrap(), None);
    }

    #[test]
    fn test_replacement_config() {
        let dir = TempDir::new().unwrap();
        let hook = CommandHook::new(
            HookPoint::AfterConfig,
            script(dir.path(), "h", r#"cat > /dev/null; echo '{"base_url":"http://hooked"}'"#),
        );
        let out = hook.after_config(&Mapping::new()).unwrap().unwrap();
        assert_eq!(out.get("base_url"), Some(&json!("http://hooked")));
    }

    #[test]
    fn test_replacement_request_receives_input() {
        let dir = TempDir::new().unwrap();
        // Echo the request back with a different method
        let hook = CommandHook::new(
            HookPoint::AfterPrepare,
            script(dir.path(), "h", "sed 's/\"GET\"/\"head\"/'"),
        );
        let req = RequestDescriptor::new("GET", "http://x", Headers::new(), None);
        let out = hook.after_prepare(&req).unwrap().unwrap();
        assert_eq!(out.method(), "HEAD");
        assert_eq!(out.url(), "http://x");
    }

    #[test]
    fn test_large_payload_through_streaming_hook() {
        let dir = TempDir::new().unwrap();
        let hook = CommandHook::new(HookPoint::AfterPrepare, script(dir.path(), "h", "cat"));
        let body = "x".repeat(512 * 1024);
        let req = RequestDescriptor::new("POST", "http://x", Headers::new(), Some(body.clone().into()));

        let out = hook.after_prepare(&req).unwrap().unwrap();
        assert_eq!(out.body().map(|b| b.to_text().into_owned()), Some(body));
    }

    #[test]
    fn test_nonzero_exit_is_hook_failure() {
        let dir = TempDir::new().unwrap();
        let hook = CommandHook::new(HookPoint::AfterConfig, script(dir.path(), "h", "echo nope >&2; exit 3"));
        let err = hook.after_config(&Mapping::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HookFailure);
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn test_unparsable_output_is_hook_failure() {
        let dir = TempDir::new().unwrap();
        let hook = CommandHook::new(HookPoint::AfterConfig, script(dir.path(), "h", "cat > /dev/null; echo '[1]'"));
        let err = hook.after_config(&Mapping::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HookFailure);
    }

    #[test]
    fn test_discover_registers_present_hooks() {
        let dir = TempDir::new().unwrap();
        let hooks = dir.path().join(HOOKS_DIR);
        fs::create_dir_all(&hooks).unwrap();
        script(&hooks, "after_prepare", "cat > /dev/null");

        let pipeline = discover(dir.path());
        assert!(!pipeline.has_handlers(HookPoint::AfterConfig));
        assert!(pipeline.has_handlers(HookPoint::AfterPrepare));
    }
}
