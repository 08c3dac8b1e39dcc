//! recurl library interface
//!
//! Runs named HTTP requests assembled from layered YAML configuration.
//!
//! # Module Organization
//!
//! - [`config`] - Layer loading, deterministic merge, four-layer resolution
//! - [`request`] - Request descriptor and the builder that assembles it
//! - [`devexp`] - Curl rendering of a prepared request
//! - [`plugins`] - Hook pipeline (`after_config`, `after_prepare`)
//! - [`client`] - HTTP transport
//! - [`app`] - App discovery, registry and scaffolding
//! - [`errors`] - Error types (RecurlError, Result)
//! - [`status`] - Exit status codes (ExitStatus)
//! - [`core`] - Main execution logic

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod core;
pub mod devexp;
pub mod errors;
pub mod output;
pub mod plugins;
pub mod request;
pub mod status;
