//! Response presentation

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::client::TransportResponse;
use crate::errors::Result;

/// What to print for a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Status line, then body
    #[default]
    Full,
    /// Body only
    Quiet,
    /// Status code only
    StatusOnly,
}

impl DisplayMode {
    pub fn from_flags(quiet: bool, only_status: bool) -> Self {
        match (quiet, only_status) {
            (_, true) => DisplayMode::StatusOnly,
            (true, false) => DisplayMode::Quiet,
            (false, false) => DisplayMode::Full,
        }
    }
}

const RESET: &str = "\x1b[0m";
const GREY: u8 = 102;

/// 256-color palette entry for a status class
fn status_color(code: u16) -> u8 {
    match code / 100 {
        1 => 109, // Informational
        2 => 71,  // Success
        3 => 185, // Redirect
        4 => 208, // Client error
        5 => 167, // Server error
        _ => GREY,
    }
}

/// `<code> <reason> – <secs>s`
pub fn status_line(response: &TransportResponse, colors: bool) -> String {
    let status = if response.reason.is_empty() {
        response.status.to_string()
    } else {
        format!("{} {}", response.status, response.reason)
    };
    let elapsed = format!("{:.2}s", response.elapsed.as_secs_f64());

    if colors {
        format!(
            "\x1b[1;38;5;{}m{}{} \x1b[38;5;{}m– {}{}",
            status_color(response.status),
            status,
            RESET,
            GREY,
            elapsed,
            RESET
        )
    } else {
        format!("{} – {}", status, elapsed)
    }
}

/// Body for display: pretty JSON for JSON content types, lossy text otherwise
pub fn format_body(response: &TransportResponse) -> String {
    let is_json = response
        .header("content-type")
        .is_some_and(|ct| ct.contains("application/json"));

    match response.json().filter(|_| is_json) {
        Some(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| response.text()),
        None => response.text(),
    }
}

/// Print a response; with `output_file` the raw body goes to the file instead
pub fn write_response<W: Write>(
    out: &mut W,
    response: &TransportResponse,
    mode: DisplayMode,
    output_file: Option<&Path>,
    colors: bool,
) -> Result<()> {
    match mode {
        DisplayMode::StatusOnly => {
            writeln!(out, "{}", response.status)?;
            return Ok(());
        }
        DisplayMode::Full => writeln!(out, "{}", status_line(response, colors))?,
        DisplayMode::Quiet => {}
    }

    if let Some(path) = output_file {
        fs::write(path, &response.body)?;
        if mode == DisplayMode::Full {
            writeln!(out, "Body written to {}", path.display())?;
        }
        return Ok(());
    }

    if !response.body.is_empty() {
        let body = format_body(response);
        if body.ends_with('\n') {
            write!(out, "{}", body)?;
        } else {
            writeln!(out, "{}", body)?;
        }
    }

    Ok(())
}
