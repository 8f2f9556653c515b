//! Rate limiting port.

use async_trait::async_trait;
use std::time::Duration;

/// Admission control keyed by an arbitrary client identifier.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Count one attempt for `key` and report whether it is admitted.
    ///
    /// Rejected attempts are counted too.
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError>;
}

/// Outcome of a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time until the key's current window closes.
    pub reset_after: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}
