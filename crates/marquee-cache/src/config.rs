use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Cache tuning options, embeddable as a `[cache]` table in the gateway's
/// TOML config. Every field has a default, so a partial or absent table
/// works.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of retained entries.
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// Maximum entry age before it is considered stale.
    #[serde(default = "default_expiry_seconds")]
    pub expiry_seconds: u64,
    /// Period of the background sweep.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            expiry_seconds: default_expiry_seconds(),
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
        }
    }
}

impl CacheConfig {
    /// Reject degenerate values. Zero is the only invalid input the unsigned
    /// fields can express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_size == 0 {
            return Err(ConfigError::ZeroMaxSize);
        }
        if self.expiry_seconds == 0 {
            return Err(ConfigError::ZeroExpiry);
        }
        if self.cleanup_interval_seconds == 0 {
            return Err(ConfigError::ZeroCleanupInterval);
        }
        Ok(())
    }

    pub fn expiry(&self) -> Duration {
        Duration::from_secs(self.expiry_seconds)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_seconds)
    }
}

/// Invalid cache configuration, rejected when the cache is constructed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cache max_size must be greater than zero")]
    ZeroMaxSize,
    #[error("cache expiry_seconds must be greater than zero")]
    ZeroExpiry,
    #[error("cache cleanup_interval_seconds must be greater than zero")]
    ZeroCleanupInterval,
}

fn default_max_size() -> usize {
    100
}
fn default_expiry_seconds() -> u64 {
    600
}
fn default_cleanup_interval_seconds() -> u64 {
    300
}
