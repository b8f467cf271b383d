/// Configuration for the timetable service
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use url::Url;

use crate::api::ApiError;

/// Env var naming a JSON configuration file.
pub const CONFIG_PATH_VAR: &str = "TIMETABLE_CONFIG";
pub const API_BASE_URL_VAR: &str = "TIMETABLE_API_BASE_URL";
pub const BIND_ADDRESS_VAR: &str = "TIMETABLE_BIND_ADDRESS";
pub const PORT_VAR: &str = "TIMETABLE_PORT";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Service configuration. Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL of the scheduler API, e.g. `http://localhost:8080/api/`
    pub api_base_url: String,
    pub bind_address: String,
    pub port: u16,
    /// Per-request timeout for scheduler API calls
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/api/".to_string(),
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_secs: 30,
            user_agent: format!("timetable/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ConsoleConfig {
    /// Loads configuration from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: ConsoleConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Loads the file named by `TIMETABLE_CONFIG` (if set), then applies
    /// the `TIMETABLE_*` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::load_from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies overrides looked up by variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_BASE_URL_VAR) {
            self.api_base_url = url;
        }
        if let Some(address) = lookup(BIND_ADDRESS_VAR) {
            self.bind_address = address;
        }
        if let Some(port) = lookup(PORT_VAR) {
            self.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                name: PORT_VAR.to_string(),
                value: port,
            })?;
        }
        Ok(())
    }

    /// The API base URL, with a trailing `/` so relative paths join under it.
    pub fn base_url(&self) -> Result<Url, ApiError> {
        let mut raw = self.api_base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Ok(Url::parse(&raw)?)
    }

    /// Address the HTTP service listens on.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
