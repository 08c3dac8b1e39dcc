//! Curl command generation
//!
//! Renders a [`RequestDescriptor`] as a single-line, copy-paste-ready curl
//! command. Output depends only on the descriptor: headers appear in the
//! descriptor's own order and nothing is sorted or added.

use crate::request::RequestDescriptor;

/// Leading program token and its silent, show-errors flag
const CURL_BASE: [&str; 2] = ["curl", "-sS"];

/// Generate the curl command for a request
pub fn render(req: &RequestDescriptor) -> String {
    let mut parts: Vec<String> = CURL_BASE.iter().map(|s| s.to_string()).collect();

    parts.push("-X".to_string());
    parts.push(shell_escape(&req.method().to_uppercase()));
    parts.push(shell_escape(req.url()));

    for (name, value) in req.headers() {
        parts.push("-H".to_string());
        parts.push(shell_escape(&format!("{}: {}", name, value)));
    }

    if let Some(body) = req.body() {
        parts.push("--data-raw".to_string());
        parts.push(shell_escape(&body.to_text()));
    }

    parts.join(" ")
}

/// Shell-escape a string for safe inclusion in a POSIX shell command.
///
/// Strings made only of `[A-Za-z0-9_@%+=:,./-]` are left bare; everything
/// else is single-quoted with embedded quotes spliced as `'"'"'`.
pub fn shell_escape(s: &str) -> String {
    let is_safe = |c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '@' | '%' | '+' | '=' | ':' | ',' | '.' | '/' | '-')
    };

    if !s.is_empty() && s.chars().all(is_safe) {
        return s.to_string();
    }

    format!("'{}'", s.replace('\'', "'\"'\"'"))
}

/// Format curl command with syntax highlighting for terminal
pub fn format_curl_pretty(cmd: &str) -> String {
    let mut result = String::new();
    let mut in_string = false;
    let mut chars = cmd.chars().peekable();

    if let Some(rest) = cmd.strip_prefix("curl") {
        result.push_str("\x1b[1;33mcurl\x1b[0m"); // Bold yellow
        chars = rest.chars().peekable();
    }

    while let Some(c) = chars.next() {
        if c == '\'' {
            if in_string {
                result.push_str("'\x1b[0m");
            } else {
                result.push_str("\x1b[32m'"); // Green for strings
            }
            in_string = !in_string;
        } else if !in_string && c == '-' && result.ends_with(' ') {
            result.push_str("\x1b[36m-"); // Cyan for flags
            while let Some(&next) = chars.peek() {
                if !(next.is_alphanumeric() || next == '-') {
                    break;
                }
                result.push(next);
                chars.next();
            }
            result.push_str("\x1b[0m");
        } else {
            result.push(c);
        }
    }

    result
}
