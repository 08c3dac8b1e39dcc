//! Process environment (terminal capabilities, working directory)

use std::path::PathBuf;

/// Execution environment
#[derive(Debug, Clone)]
pub struct Environment {
    pub stdout_isatty: bool,
    pub stderr_isatty: bool,
    /// Whether ANSI colors may be written to stdout
    pub colors: bool,
    pub program_name: String,
    pub cwd: PathBuf,
}

impl Environment {
    /// Detect the environment of the running process
    pub fn init() -> Self {
        Self::default()
    }

    /// Environment for non-interactive use (no tty, no colors)
    pub fn plain(cwd: impl Into<PathBuf>) -> Self {
        Self {
            stdout_isatty: false,
            stderr_isatty: false,
            colors: false,
            program_name: "recurl".to_string(),
            cwd: cwd.into(),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        let stdout_isatty = atty::is(atty::Stream::Stdout);
        Self {
            stdout_isatty,
            stderr_isatty: atty::is(atty::Stream::Stderr),
            colors: stdout_isatty && detect_color_support(),
            program_name: "recurl".to_string(),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

fn detect_color_support() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    !matches!(std::env::var("TERM").as_deref(), Ok("dumb"))
}
