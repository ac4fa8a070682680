//! Dispatch configuration.
//!
//! Rate limiting, 429 backoff and the transport timeout are process-wide
//! settings: they are fixed when a client is built, never per request.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::limiter::RateLimitConfig;

/// Delay window for retrying a request the server answered with 429.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Lower bound in milliseconds (default: 500).
    #[serde(default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Upper bound in milliseconds (default: 7000).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_min_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    7_000
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl BackoffConfig {
    pub fn new(min_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            min_delay_ms,
            max_delay_ms,
        }
    }

    /// Draw a delay uniformly from `[min_delay_ms, max_delay_ms]`.
    pub fn sample_delay(&self) -> Duration {
        let ms = if self.min_delay_ms >= self.max_delay_ms {
            self.min_delay_ms
        } else {
            rand::thread_rng().gen_range(self.min_delay_ms..=self.max_delay_ms)
        };
        Duration::from_millis(ms)
    }
}

/// Everything the dispatcher needs besides a transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub backoff: BackoffConfig,

    /// Overall per-attempt timeout of the HTTP transport. `None` waits forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

pub const ENV_RATE_LIMIT_ENABLED: &str = "TRELLO_RATE_LIMIT_ENABLED";
pub const ENV_RATE_LIMIT_MAX_REQUESTS: &str = "TRELLO_RATE_LIMIT_MAX_REQUESTS";
pub const ENV_RATE_LIMIT_WINDOW_MS: &str = "TRELLO_RATE_LIMIT_WINDOW_MS";
pub const ENV_BACKOFF_MIN_MS: &str = "TRELLO_BACKOFF_MIN_MS";
pub const ENV_BACKOFF_MAX_MS: &str = "TRELLO_BACKOFF_MAX_MS";
pub const ENV_TIMEOUT_MS: &str = "TRELLO_TIMEOUT_MS";

impl DispatchConfig {
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Read settings from the process environment. Unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`DispatchConfig::from_env`], with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(enabled) = parse_var::<bool>(&lookup, ENV_RATE_LIMIT_ENABLED)? {
            config.rate_limit.enabled = enabled;
        }
        if let Some(n) = parse_var(&lookup, ENV_RATE_LIMIT_MAX_REQUESTS)? {
            config.rate_limit.max_requests = n;
        }
        if let Some(ms) = parse_var(&lookup, ENV_RATE_LIMIT_WINDOW_MS)? {
            config.rate_limit.window_ms = ms;
        }
        if let Some(ms) = parse_var(&lookup, ENV_BACKOFF_MIN_MS)? {
            config.backoff.min_delay_ms = ms;
        }
        if let Some(ms) = parse_var(&lookup, ENV_BACKOFF_MAX_MS)? {
            config.backoff.max_delay_ms = ms;
        }
        config.timeout_ms = parse_var(&lookup, ENV_TIMEOUT_MS)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.rate_limit.enabled && self.rate_limit.max_requests == 0 {
            return Err(ApiError::InvalidConfig(
                "rate limit max_requests must be at least 1".to_string(),
            ));
        }
        if self.rate_limit.enabled && self.rate_limit.window_ms == 0 {
            return Err(ApiError::InvalidConfig(
                "rate limit window_ms must be positive".to_string(),
            ));
        }
        if self.backoff.min_delay_ms > self.backoff.max_delay_ms {
            return Err(ApiError::InvalidConfig(format!(
                "backoff min_delay_ms ({}) exceeds max_delay_ms ({})",
                self.backoff.min_delay_ms, self.backoff.max_delay_ms
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, ApiError> {
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ApiError::InvalidConfig(format!("{name}={raw:?} is not valid"))),
    }
}
