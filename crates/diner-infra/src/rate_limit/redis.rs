//! Redis fixed-window rate limiter, shared by every server instance.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, Script};

use diner_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

use super::RateLimitConfig;

/// Redis rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RedisRateLimitConfig {
    pub url: String,
    pub connect_timeout: Duration,
    pub policy: RateLimitConfig,
    /// Prefix for rate limit keys.
    pub key_prefix: String,
}

impl RedisRateLimitConfig {
    pub fn new(url: impl Into<String>, policy: RateLimitConfig) -> Self {
        Self {
            url: url.into(),
            connect_timeout: Duration::from_secs(2),
            policy,
            key_prefix: std::env::var("RATE_LIMIT_KEY_PREFIX")
                .unwrap_or_else(|_| "diner:orders".to_string()),
        }
    }
}

// INCR opens the window on the first attempt; the key expiring closes it.
// Returns [count, remaining window in ms].
const FIXED_WINDOW: &str = r#"
local current = redis.call('INCR', KEYS[1])
if current == 1 then
    redis.call('PEXPIRE', KEYS[1], ARGV[1])
end
local ttl = redis.call('PTTL', KEYS[1])
return {current, ttl}
"#;

pub struct RedisRateLimiter {
    conn: ConnectionManager,
    config: RedisRateLimitConfig,
    script: Script,
}

impl RedisRateLimiter {
    pub async fn new(config: RedisRateLimitConfig) -> Result<Self, RateLimitError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| RateLimitError::Backend(e.to_string()))?;

        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| RateLimitError::Backend("Connection timed out".to_string()))?
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        tracing::info!(prefix = %config.key_prefix, "Connected to Redis rate limiter");

        Ok(Self {
            conn,
            config,
            script: Script::new(FIXED_WINDOW),
        })
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}:{}", self.config.key_prefix, key)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        let policy = &self.config.policy;
        let mut conn = self.conn.clone();

        let reply: Vec<i64> = self
            .script
            .key(self.make_key(key))
            .arg(policy.window.as_millis() as u64)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        let count = reply.first().copied().unwrap_or(1).max(1) as u32;
        let ttl_ms = reply.get(1).copied().unwrap_or(0).max(0) as u64;

        Ok(RateLimitResult {
            allowed: count <= policy.max_requests,
            limit: policy.max_requests,
            remaining: policy.max_requests.saturating_sub(count),
            reset_after: Duration::from_millis(ttl_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_limiter() -> Option<RedisRateLimiter> {
        let mut config = RedisRateLimitConfig::new(
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            RateLimitConfig {
                max_requests: 2,
                window: Duration::from_secs(1),
            },
        );
        config.connect_timeout = Duration::from_millis(500);
        config.key_prefix = format!("test_ratelimit:{}", std::process::id());

        RedisRateLimiter::new(config).await.ok()
    }

    #[tokio::test]
    async fn test_redis_fixed_window() {
        // Skipped when no Redis server is reachable.
        let Some(limiter) = test_limiter().await else {
            return;
        };

        let key = "203.0.113.7";
        assert_eq!(limiter.check(key).await.unwrap().remaining, 1);
        assert_eq!(limiter.check(key).await.unwrap().remaining, 0);
        assert!(!limiter.check(key).await.unwrap().allowed);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(limiter.check(key).await.unwrap().allowed);
    }
}
