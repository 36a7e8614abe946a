//! Backend configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! command-line flags (which clap also fills from the environment).

use crate::Address;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// ERC20 portal of the local development chain.
pub const DEFAULT_ERC20_PORTAL: &str = "0x9C21AEb2093C32DDbC53eEF24B873BDCd1aDa1DB";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct RollupConfig {
    /// Base URL of the rollup HTTP server.
    #[serde(default)]
    #[getter(skip)]
    rollup_url: Option<String>,

    /// Address whose inputs are ERC20 deposit notifications.
    #[serde(default = "default_erc20_portal")]
    erc20_portal: Address,

    /// Pause before polling again after a transport failure.
    #[serde(default = "default_retry_delay_ms")]
    retry_delay_ms: u64,
}

#[instrument]
fn default_erc20_portal() -> Address {
    Address::from_bytes([
        0x9c, 0x21, 0xae, 0xb2, 0x09, 0x3c, 0x32, 0xdd, 0xbc, 0x53, 0xee, 0xf2, 0x4b, 0x87, 0x3b,
        0xdc, 0xd1, 0xad, 0xa1, 0xdb,
    ])
}

#[instrument]
fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for RollupConfig {
    fn default() -> Self {
        Self {
            rollup_url: None,
            erc20_portal: default_erc20_portal(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl RollupConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(erc20_portal = %config.erc20_portal, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise starts from defaults.
    #[instrument(skip(path), fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides; `None` keeps the current value.
    #[instrument(skip(self))]
    pub fn with_overrides(
        mut self,
        rollup_url: Option<String>,
        erc20_portal: Option<Address>,
        retry_delay_ms: Option<u64>,
    ) -> Self {
        if let Some(url) = rollup_url {
            self.rollup_url = Some(url);
        }
        if let Some(portal) = erc20_portal {
            self.erc20_portal = portal;
        }
        if let Some(delay) = retry_delay_ms {
            self.retry_delay_ms = delay;
        }
        self
    }

    /// Base URL of the rollup server.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if no source provided one.
    #[track_caller]
    pub fn rollup_url(&self) -> Result<&str, ConfigError> {
        self.rollup_url.as_deref().ok_or_else(|| {
            ConfigError::new(
                "Rollup server URL not set (use --rollup-url or ROLLUP_HTTP_SERVER_URL)".to_string(),
            )
        })
    }

    /// Retry pause as a [`Duration`].
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_portal_matches_constant() {
        let parsed: Address = DEFAULT_ERC20_PORTAL.parse().unwrap();
        assert_eq!(*RollupConfig::default().erc20_portal(), parsed);
    }

    #[test]
    fn test_missing_url_is_error() {
        assert!(RollupConfig::default().rollup_url().is_err());
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let config = RollupConfig::default().with_overrides(
            Some("http://127.0.0.1:5004".to_string()),
            None,
            Some(50),
        );
        assert_eq!(config.rollup_url().unwrap(), "http://127.0.0.1:5004");
        assert_eq!(*config.retry_delay_ms(), 50);
        assert_eq!(config.erc20_portal(), RollupConfig::default().erc20_portal());
    }
}
