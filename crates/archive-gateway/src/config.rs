//! Gateway configuration.
//!
//! Configuration can be loaded from:
//! - A TOML file (path in `ARCHIVE_CONFIG`)
//! - Environment variables (`ARCHIVE_*` prefixed)
//!
//! # Example
//!
//! ```rust,no_run
//! use archive_gateway::config::GatewayConfig;
//!
//! // File at $ARCHIVE_CONFIG if set, otherwise env vars
//! let config = GatewayConfig::load().expect("Failed to load config");
//!
//! // Or explicitly from a file
//! let config = GatewayConfig::from_file(std::path::Path::new("archive.toml")).expect("Failed to load");
//! ```

use std::env;
use std::path::Path;

use archive_core::defaults;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for archive_core::Error {
    fn from(e: ConfigError) -> Self {
        archive_core::Error::Config(e.to_string())
    }
}

/// Connection settings for the archive contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the RPC node; requests go to `{rpc_url}/api/rpc`.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Address of the deployed archive contract.
    #[serde(default)]
    pub contract_address: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_rpc_url() -> String {
    defaults::RPC_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    defaults::REQUEST_TIMEOUT_SECS
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            contract_address: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    /// Build from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let rpc_url = env::var(defaults::ENV_RPC_URL).unwrap_or_else(|_| default_rpc_url());
        let contract_address = env::var(defaults::ENV_CONTRACT_ADDRESS).unwrap_or_default();
        let timeout_secs = env::var(defaults::ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::REQUEST_TIMEOUT_SECS);

        debug!(rpc_url = %rpc_url, timeout_secs, "Gateway config from environment");

        Self {
            rpc_url,
            contract_address,
            timeout_secs,
        }
    }

    /// Parse a TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        info!(path = %path.display(), "Loaded gateway config file");
        Ok(config)
    }

    /// Load from the file named by `ARCHIVE_CONFIG` if set, else from env.
    pub fn load() -> ConfigResult<Self> {
        let config = match env::var(defaults::ENV_CONFIG_PATH) {
            Ok(path) if !path.is_empty() => Self::from_file(Path::new(&path))?,
            _ => Self::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.rpc_url.is_empty() {
            return Err(ConfigError::Validation(
                "rpc_url cannot be empty".to_string(),
            ));
        }

        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "rpc_url must start with http:// or https://, got: {}",
                self.rpc_url
            )));
        }

        if self.contract_address.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "contract_address is required (set {})",
                defaults::ENV_CONTRACT_ADDRESS
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Full URL of the JSON-RPC endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.rpc_url.trim_end_matches('/'), defaults::RPC_PATH)
    }
}
