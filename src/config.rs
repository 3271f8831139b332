/*!
 * Channel Configuration
 *
 * Default depth and timeout policies for channels created by services.
 *
 * Environment variables (read by [`ChannelConfig::from_env`]):
 * - CHANNEL_DEPTH: maximum queue depth
 * - CHANNEL_WRITE_TIMEOUT_MS: write timeout in ms, `0` for immediate,
 *   `infinite` to block indefinitely
 * - CHANNEL_READ_TIMEOUT_MS: read timeout, same format
 */

use crate::core::limits::{
    DEFAULT_CHANNEL_DEPTH, LOW_LATENCY_CHANNEL_TIMEOUT, STANDARD_CHANNEL_TIMEOUT,
};
use crate::core::timeout::Timeout;
use thiserror::Error;

pub const DEPTH_ENV: &str = "CHANNEL_DEPTH";
pub const WRITE_TIMEOUT_ENV: &str = "CHANNEL_WRITE_TIMEOUT_MS";
pub const READ_TIMEOUT_ENV: &str = "CHANNEL_READ_TIMEOUT_MS";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Channel configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Maximum number of buffered messages
    pub depth: usize,
    /// Timeout for blocking writes (default: 10s)
    pub write_timeout: Timeout,
    /// Timeout for blocking reads (default: 10s)
    pub read_timeout: Timeout,
}

impl ChannelConfig {
    /// Create default configuration
    pub const fn new() -> Self {
        Self {
            depth: DEFAULT_CHANNEL_DEPTH,
            write_timeout: Timeout::After(STANDARD_CHANNEL_TIMEOUT),
            read_timeout: Timeout::After(STANDARD_CHANNEL_TIMEOUT),
        }
    }

    /// Short timeouts for producers that must not stall
    pub const fn low_latency() -> Self {
        Self {
            depth: DEFAULT_CHANNEL_DEPTH,
            write_timeout: Timeout::After(LOW_LATENCY_CHANNEL_TIMEOUT),
            read_timeout: Timeout::After(LOW_LATENCY_CHANNEL_TIMEOUT),
        }
    }

    /// Block indefinitely on both sides; only `close()` releases waiters
    pub const fn unbounded_waits() -> Self {
        Self {
            depth: DEFAULT_CHANNEL_DEPTH,
            write_timeout: Timeout::Infinite,
            read_timeout: Timeout::Infinite,
        }
    }

    /// Set queue depth
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Set write timeout
    pub fn with_write_timeout(mut self, timeout: Timeout) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Set read timeout
    pub fn with_read_timeout(mut self, timeout: Timeout) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Load configuration from the process environment
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(raw) = lookup(DEPTH_ENV) {
            config.depth = raw
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidValue {
                    key: DEPTH_ENV,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
        }
        if let Some(raw) = lookup(WRITE_TIMEOUT_ENV) {
            config.write_timeout = parse_timeout(WRITE_TIMEOUT_ENV, &raw)?;
        }
        if let Some(raw) = lookup(READ_TIMEOUT_ENV) {
            config.read_timeout = parse_timeout(READ_TIMEOUT_ENV, &raw)?;
        }

        Ok(config)
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_timeout(key: &'static str, raw: &str) -> Result<Timeout, ConfigError> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("infinite") {
        return Ok(Timeout::Infinite);
    }
    value
        .parse::<u64>()
        .map(Timeout::from_millis)
        .map_err(|e| ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}
