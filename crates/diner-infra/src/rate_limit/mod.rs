//! Rate limiting implementations.

use std::time::Duration;

mod memory;

pub use memory::InMemoryRateLimiter;

#[cfg(feature = "redis")]
mod redis;
#[cfg(feature = "redis")]
pub use self::redis::{RedisRateLimitConfig, RedisRateLimiter};

/// Fixed-window admission policy shared by every limiter backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Attempts admitted per key per window.
    pub max_requests: u32,
    /// Window length, measured from a key's first attempt.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_requests),
            window: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.window),
        }
    }

    /// Advisory text sent back with rejected attempts.
    pub fn advisory(&self) -> String {
        let minutes = self.window.as_secs().div_ceil(60);
        format!("Too many orders from this address, please try again after {minutes} minutes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_ten_per_quarter_hour() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 10);
        assert_eq!(config.window, Duration::from_secs(900));
        assert_eq!(
            config.advisory(),
            "Too many orders from this address, please try again after 15 minutes"
        );
    }
}
