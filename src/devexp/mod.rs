//! Developer Experience features
//!
//! - **Curl Rendering**: show a prepared request as an equivalent curl command
//!
//! ```bash
//! recurl create-user --dry-run
//!
//! # Output:
//! # curl -sS -X POST https://api.example.com/users -H 'Content-Type: application/json' --data-raw '{"name":"x"}'
//! ```

pub mod curl;

pub use curl::{format_curl_pretty, render, shell_escape};
