//! TLS options taken from the merged configuration
//!
//! Keys:
//! - `verify`: `true` (default), `false` to skip server verification, or a
//!   path to a PEM CA bundle
//! - `cert` / `key`: PEM client certificate and private key. `cert` alone may
//!   hold both.
//!
//! Every configured path must exist before any connection is attempted. The
//! pair is not checked for a cryptographic match.

use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Mapping;
use crate::errors::{RecurlError, Result};

/// Server certificate verification mode
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Verify {
    #[default]
    System,
    Disabled,
    CaBundle(PathBuf),
}

/// Client certificate configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientCertificate {
    pub cert_file: Option<PathBuf>,
    pub key_file: Option<PathBuf>,
}

impl ClientCertificate {
    pub fn is_configured(&self) -> bool {
        self.cert_file.is_some()
    }

    /// Fail if any configured file is missing
    pub fn check_files(&self) -> Result<()> {
        for path in self.cert_file.iter().chain(self.key_file.iter()) {
            if !path.is_file() {
                return Err(RecurlError::CredentialFileMissing(path.clone()));
            }
        }
        Ok(())
    }

    /// Load the identity for reqwest
    pub fn load_identity(&self) -> Result<Option<reqwest::Identity>> {
        let cert_path = match &self.cert_file {
            Some(path) => path,
            None => return Ok(None),
        };
        self.check_files()?;

        let mut pem = read(cert_path)?;
        if let Some(key_path) = &self.key_file {
            pem.extend_from_slice(b"\n");
            pem.extend_from_slice(&read(key_path)?);
        }

        reqwest::Identity::from_pem(&pem)
            .map(Some)
            .map_err(|e| RecurlError::Ssl(format!("Failed to load PEM identity: {}", e)))
    }
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| RecurlError::Ssl(format!("Failed to read '{}': {}", path.display(), e)))
}

/// SSL/TLS configuration options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SslConfig {
    pub verify: Verify,
    pub client_cert: ClientCertificate,
}

impl SslConfig {
    /// Read TLS options from the merged configuration
    pub fn from_config(merged: &Mapping) -> Result<Self> {
        let verify = match merged.get("verify") {
            None | Some(JsonValue::Null) | Some(JsonValue::Bool(true)) => Verify::System,
            Some(JsonValue::Bool(false)) => Verify::Disabled,
            Some(JsonValue::String(path)) => Verify::CaBundle(PathBuf::from(path)),
            Some(_) => {
                return Err(RecurlError::InvalidField {
                    field: "verify",
                    expected: "a boolean or a CA bundle path",
                })
            }
        };

        let client_cert = ClientCertificate {
            cert_file: path_field(merged, "cert")?,
            key_file: path_field(merged, "key")?,
        };

        if client_cert.key_file.is_some() && client_cert.cert_file.is_none() {
            return Err(RecurlError::MissingRequiredField("cert"));
        }

        Ok(Self { verify, client_cert })
    }

    /// Check every referenced file exists
    pub fn check_files(&self) -> Result<()> {
        if let Verify::CaBundle(path) = &self.verify {
            if !path.is_file() {
                return Err(RecurlError::CredentialFileMissing(path.clone()));
            }
        }
        self.client_cert.check_files()
    }

    /// Apply SSL config to a reqwest ClientBuilder
    pub fn apply_to_builder(&self, mut builder: reqwest::ClientBuilder) -> Result<reqwest::ClientBuilder> {
        self.check_files()?;

        match &self.verify {
            Verify::System => {}
            Verify::Disabled => builder = builder.danger_accept_invalid_certs(true),
            Verify::CaBundle(path) => {
                let certs = reqwest::Certificate::from_pem_bundle(&read(path)?)
                    .map_err(|e| RecurlError::Ssl(format!("Failed to parse CA bundle: {}", e)))?;
                for cert in certs {
                    builder = builder.add_root_certificate(cert);
                }
            }
        }

        if let Some(identity) = self.client_cert.load_identity()? {
            builder = builder.identity(identity);
        }

        Ok(builder)
    }
}

fn path_field(merged: &Mapping, key: &'static str) -> Result<Option<PathBuf>> {
    match merged.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(path)) if path.is_empty() => Ok(None),
        Some(JsonValue::String(path)) => Ok(Some(PathBuf::from(path))),
        Some(_) => Err(RecurlError::InvalidField { field: key, expected: "a file path" }),
    }
}
