//! Service configuration
//!
//! Read from TOML; every key is optional.
//!
//! ```toml
//! listen_addr = "0.0.0.0:8080"
//! used_piece_batch_size = 20
//!
//! [retry]
//! max_attempts = 5
//! delay_ms = 2000
//! ```

use crate::error::ConfigError;
use docname_store::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Retry settings for store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// Attempts per operation, first one included
    pub max_attempts: u32,
    /// Fixed delay between attempts
    pub delay_ms: u64,
}

impl RetryConfig {
    /// Retry policy for these settings
    #[inline]
    #[must_use]
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_ms: 2000,
        }
    }
}

/// Naming service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    /// Store retry settings
    pub retry: RetryConfig,
    /// Pieces per used-piece update of a date-change job
    pub used_piece_batch_size: usize,
    /// HTTP listen address
    pub listen_addr: SocketAddr,
}

impl NamingConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With retry settings
    #[inline]
    #[must_use]
    pub fn with_retry(mut self, max_attempts: u32, delay: Duration) -> Self {
        self.retry = RetryConfig {
            max_attempts,
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        };
        self
    }

    /// With used-piece batch size
    #[inline]
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.used_piece_batch_size = size;
        self
    }

    /// With listen address
    #[inline]
    #[must_use]
    pub fn with_listen_addr(mut self, addr: SocketAddr) -> Self {
        self.listen_addr = addr;
        self
    }

    /// Parse and validate TOML text
    ///
    /// # Errors
    /// - `ConfigError::Parse` on malformed TOML or unknown keys
    /// - `ConfigError::Invalid` when validation fails
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; a missing file yields the defaults
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file exists but cannot be read
    /// - any error of [`NamingConfig::from_toml_str`]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `ConfigError::Invalid` for zero attempts or a zero batch size
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.max_attempts must be at least 1".into()));
        }
        if self.used_piece_batch_size == 0 {
            return Err(ConfigError::Invalid(
                "used_piece_batch_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            used_piece_batch_size: 20,
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}
