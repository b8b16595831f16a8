//! Configuration
//!
//! Read from a TOML file (`~/.config/villa-booking/config.toml` by default).
//! Every field has a default, so a partial or missing file is fine.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [services]
//! villa_url = "http://localhost:8002"
//! reservation_url = "http://localhost:8003"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::shared::errors::InfraError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub services: ServicesConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

/// Upstream service endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    pub villa_url: String,
    pub reservation_url: String,
    pub request_timeout_secs: u64,
    /// Attempts for idempotent reads (1 = no retry)
    pub retry_attempts: u32,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            villa_url: "http://localhost:8002".to_string(),
            reservation_url: "http://localhost:8003".to_string(),
            request_timeout_secs: 10,
            retry_attempts: 3,
        }
    }
}

impl ServicesConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `villa_booking=debug,tower_http=info`
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, InfraError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, InfraError> {
        toml::from_str(raw).map_err(|e| InfraError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, InfraError> {
        toml::to_string_pretty(self).map_err(|e| InfraError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), InfraError> {
        if self.server.port == 0 {
            return Err(InfraError::Config("server.port must not be 0".into()));
        }
        for (name, url) in [
            ("services.villa_url", &self.services.villa_url),
            ("services.reservation_url", &self.services.reservation_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(InfraError::Config(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }
        if self.services.request_timeout_secs == 0 {
            return Err(InfraError::Config(
                "services.request_timeout_secs must be positive".into(),
            ));
        }
        match self.logging.format.to_lowercase().as_str() {
            "text" | "json" => Ok(()),
            other => Err(InfraError::Config(format!(
                "logging.format must be 'text' or 'json', got '{}'",
                other
            ))),
        }
    }

    /// Listen address, `host:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// `~/.config/villa-booking/config.toml` (platform config dir)
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("villa-booking")
        .join("config.toml")
}
