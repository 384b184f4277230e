//! Startup configuration for the OCR demo.
//!
//! Values come from the environment (optionally seeded from `.env`). The
//! endpoint URL and secret key are required; everything else has a default.

use std::fmt;
use std::net::SocketAddr;
use thiserror::Error;

pub const ENV_OCR_URL: &str = "OCR_URL";
pub const ENV_OCR_SECRET_KEY: &str = "OCR_SECRET_KEY";
pub const ENV_BIND_ADDR: &str = "OCR_BIND_ADDR";
pub const ENV_MAX_UPLOAD_BYTES: &str = "OCR_MAX_UPLOAD_BYTES";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024; // 20MB

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Read-only configuration, loaded once at startup.
#[derive(Clone)]
pub struct OcrConfig {
    pub endpoint_url: String,
    pub secret_key: String,
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
}

impl OcrConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let endpoint_url = required(ENV_OCR_URL)?;
        let secret_key = required(ENV_OCR_SECRET_KEY)?;

        let bind_raw = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: ENV_BIND_ADDR,
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let max_upload_bytes = match lookup(ENV_MAX_UPLOAD_BYTES) {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::Invalid {
                    name: ENV_MAX_UPLOAD_BYTES,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            endpoint_url,
            secret_key,
            bind_addr,
            max_upload_bytes,
        })
    }
}

impl fmt::Debug for OcrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("secret_key", &"[REDACTED]")
            .field("bind_addr", &self.bind_addr)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}
