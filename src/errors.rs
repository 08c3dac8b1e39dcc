//! Error types for recurl

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for recurl
#[derive(Error, Debug)]
pub enum RecurlError {
    #[error("Not inside a recurl app (missing {marker}) starting from {}", .start.display())]
    AppRootNotFound { marker: &'static str, start: PathBuf },

    #[error("Endpoint YAML not found: {}", .0.display())]
    EndpointNotFound(PathBuf),

    #[error("Unknown app: {0}")]
    AppNotRegistered(String),

    #[error("Invalid document {}: {reason}", .path.display())]
    InvalidDocument { path: PathBuf, reason: String },

    #[error("Failed to read {}: {source}", .path.display())]
    ReadLayer {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("Invalid field `{field}`: expected {expected}")]
    InvalidField { field: &'static str, expected: &'static str },

    #[error("Certificate or key file is missing on disk: {}", .0.display())]
    CredentialFileMissing(PathBuf),

    #[error("Hook `{hook}` failed: {message}")]
    Hook { hook: &'static str, message: String },

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SSL error: {0}")]
    Ssl(String),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Invalid argument: {0}")]
    Argument(String),
}

/// Coarse classification of a [`RecurlError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidDocument,
    MissingRequiredField,
    CredentialFileMissing,
    HookFailure,
    Io,
    Transport,
    Other,
}

impl RecurlError {
    /// Classify the error so callers can branch without matching on messages
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecurlError::AppRootNotFound { .. }
            | RecurlError::EndpointNotFound(_)
            | RecurlError::AppNotRegistered(_) => ErrorKind::NotFound,
            RecurlError::InvalidDocument { .. } | RecurlError::InvalidField { .. } => {
                ErrorKind::InvalidDocument
            }
            RecurlError::MissingRequiredField(_) => ErrorKind::MissingRequiredField,
            RecurlError::CredentialFileMissing(_) => ErrorKind::CredentialFileMissing,
            RecurlError::Hook { .. } => ErrorKind::HookFailure,
            RecurlError::ReadLayer { .. } | RecurlError::Io(_) => ErrorKind::Io,
            RecurlError::Request(_) | RecurlError::Ssl(_) => ErrorKind::Transport,
            RecurlError::Json(_) | RecurlError::Registry(_) | RecurlError::Argument(_) => {
                ErrorKind::Other
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RecurlError>;
