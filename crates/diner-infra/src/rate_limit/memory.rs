//! In-memory fixed-window rate limiter.
//!
//! Each key gets a window that opens on its first attempt. Every attempt in
//! the window is counted; once the count passes `max_requests` the key is
//! rejected until the window has fully elapsed, then the count restarts.
//! Limits are per-process, not shared across instances.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use diner_core::ports::{RateLimitError, RateLimitResult, RateLimiter};

use super::RateLimitConfig;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

impl Window {
    fn open(now: Instant) -> Self {
        Self {
            started: now,
            count: 0,
        }
    }
}

pub struct InMemoryRateLimiter {
    windows: Mutex<HashMap<String, Window>>,
    config: RateLimitConfig,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn expired(&self, window: &Window, now: Instant) -> bool {
        now.duration_since(window.started) > self.config.window
    }

    /// Drop windows that have fully elapsed. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;
        let before = windows.len();
        windows.retain(|_, window| !self.expired(window, now));
        before - windows.len()
    }

    /// Purge expired windows every `every` until the limiter is dropped.
    pub fn spawn_purge(self: &Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        let limiter: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(limiter) = limiter.upgrade() else {
                    break;
                };
                let purged = limiter.purge_expired().await;
                if purged > 0 {
                    tracing::debug!(purged, "Purged expired rate limit windows");
                }
            }
        })
    }
}

impl Default for InMemoryRateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        let window = windows
            .entry(key.to_string())
            .or_insert_with(|| Window::open(now));
        if self.expired(window, now) {
            *window = Window::open(now);
        }
        window.count = window.count.saturating_add(1);

        let limit = self.config.max_requests;
        Ok(RateLimitResult {
            allowed: window.count <= limit,
            limit,
            remaining: limit.saturating_sub(window.count),
            reset_after: self
                .config
                .window
                .saturating_sub(now.duration_since(window.started)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(15 * 60);

    fn limiter() -> InMemoryRateLimiter {
        InMemoryRateLimiter::new(RateLimitConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_admits_ten_then_rejects() {
        let limiter = limiter();

        for attempt in 1..=10 {
            let result = limiter.check("10.0.0.1").await.unwrap();
            assert!(result.allowed, "attempt {attempt} should be admitted");
            assert_eq!(result.remaining, 10 - attempt);
        }

        let eleventh = limiter.check("10.0.0.1").await.unwrap();
        assert!(!eleventh.allowed);
        assert_eq!(eleventh.remaining, 0);
        assert_eq!(eleventh.reset_after, WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let limiter = limiter();
        for _ in 0..11 {
            limiter.check("10.0.0.1").await.unwrap();
        }

        assert!(!limiter.check("10.0.0.1").await.unwrap().allowed);
        assert!(limiter.check("10.0.0.2").await.unwrap().allowed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets_only_after_it_fully_elapses() {
        let limiter = limiter();
        for _ in 0..10 {
            limiter.check("10.0.0.1").await.unwrap();
        }

        tokio::time::advance(WINDOW).await;
        let at_boundary = limiter.check("10.0.0.1").await.unwrap();
        assert!(!at_boundary.allowed);

        tokio::time::advance(Duration::from_millis(1)).await;
        let fresh = limiter.check("10.0.0.1").await.unwrap();
        assert!(fresh.allowed);
        assert_eq!(fresh.remaining, 9);
        assert_eq!(fresh.reset_after, WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_attempts_keep_counting() {
        let limiter = InMemoryRateLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_secs(60),
        });

        assert!(limiter.check("k").await.unwrap().allowed);
        tokio::time::advance(Duration::from_secs(30)).await;
        let rejected = limiter.check("k").await.unwrap();
        assert!(!rejected.allowed);
        assert_eq!(rejected.reset_after, Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_attempts_are_all_counted() {
        let limiter = Arc::new(limiter());

        let handles: Vec<_> = (0..25)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.check("burst").await.unwrap().allowed })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_drops_only_elapsed_windows() {
        let limiter = limiter();
        limiter.check("old").await.unwrap();
        tokio::time::advance(Duration::from_secs(10 * 60)).await;
        limiter.check("recent").await.unwrap();
        tokio::time::advance(Duration::from_secs(6 * 60)).await;

        assert_eq!(limiter.purge_expired().await, 1);
        assert!(limiter.windows.lock().await.contains_key("recent"));
    }
}
