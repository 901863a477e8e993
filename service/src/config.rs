//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use referenda_types::ChainConstants;

use crate::logging::LogFormat;
use crate::ServiceError;

/// Configuration for one chain's accounting service.
///
/// Every field has a default, so an empty file is a valid Polkadot
/// configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Chain name the graph and cache entries are keyed by.
    #[serde(default = "default_chain")]
    pub chain: String,

    /// Average block production time in milliseconds.
    #[serde(default = "default_block_time_ms")]
    pub block_time_ms: u64,

    /// Blocks per conviction lock period.
    #[serde(default = "default_vote_locking_period")]
    pub vote_locking_period: u64,

    /// Blocks a referendum may wait for a decision deposit.
    #[serde(default = "default_undeciding_timeout")]
    pub undeciding_timeout: u64,

    /// "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_chain() -> String {
    "polkadot".to_string()
}

fn default_block_time_ms() -> u64 {
    6_000
}

fn default_vote_locking_period() -> u64 {
    ChainConstants::polkadot().vote_locking_period
}

fn default_undeciding_timeout() -> u64 {
    ChainConstants::polkadot().undeciding_timeout
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ServiceError> {
        let config: Self = toml::from_str(s).map_err(|e| ServiceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ServiceError> {
        toml::to_string_pretty(self).map_err(|e| ServiceError::Config(e.to_string()))
    }

    /// Chain constants the claim estimator runs with.
    pub fn constants(&self) -> ChainConstants {
        ChainConstants {
            vote_locking_period: self.vote_locking_period,
            undeciding_timeout: self.undeciding_timeout,
        }
    }

    pub fn block_time(&self) -> Duration {
        Duration::from_millis(self.block_time_ms)
    }

    pub fn log_format(&self) -> Result<LogFormat, ServiceError> {
        self.log_format.parse()
    }

    fn validate(&self) -> Result<(), ServiceError> {
        if self.block_time_ms == 0 {
            return Err(ServiceError::Config("block_time_ms must be positive".into()));
        }
        self.log_format()?;
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            chain: default_chain(),
            block_time_ms: default_block_time_ms(),
            vote_locking_period: default_vote_locking_period(),
            undeciding_timeout: default_undeciding_timeout(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
