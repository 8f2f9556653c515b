//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use diner_core::ports::{MenuRepository, OrderRepository, RateLimiter};
use diner_infra::{
    DatabaseConfig, InMemoryMenuRepository, InMemoryOrderRepository, InMemoryRateLimiter,
    MongoConfig, RateLimitConfig,
};

#[cfg(feature = "mongo")]
use diner_infra::MongoMenuRepository;
#[cfg(feature = "postgres")]
use diner_infra::PostgresOrderRepository;
#[cfg(feature = "redis")]
use diner_infra::{RedisRateLimitConfig, RedisRateLimiter};

use crate::config::AppConfig;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderRepository>,
    pub menu: Arc<dyn MenuRepository>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub rate_limit: RateLimitConfig,
    pub trust_proxy: bool,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let state = Self {
            orders: order_store(config.database.as_ref()).await,
            menu: menu_store(config.menu_store.as_ref()).await,
            rate_limiter: rate_limiter(config.redis_url.as_deref(), &config.rate_limit).await,
            rate_limit: config.rate_limit.clone(),
            trust_proxy: config.trust_proxy,
        };

        tracing::info!("Application state initialized");
        state
    }

    /// Everything in memory.
    #[cfg(test)]
    pub fn in_memory(rate_limit: RateLimitConfig) -> Self {
        Self {
            orders: Arc::new(InMemoryOrderRepository::new()),
            menu: Arc::new(InMemoryMenuRepository::new()),
            rate_limiter: Arc::new(InMemoryRateLimiter::new(rate_limit.clone())),
            rate_limit,
            trust_proxy: false,
        }
    }
}

#[cfg(feature = "postgres")]
async fn order_store(config: Option<&DatabaseConfig>) -> Arc<dyn OrderRepository> {
    let Some(config) = config else {
        tracing::warn!("DATABASE_URL not set. Orders are kept in memory.");
        return Arc::new(InMemoryOrderRepository::new());
    };

    match config.connect().await {
        Ok(conn) => Arc::new(PostgresOrderRepository::new(conn)),
        Err(e) => {
            tracing::error!(
                "Failed to connect to orders database: {}. Using in-memory fallback.",
                e
            );
            Arc::new(InMemoryOrderRepository::new())
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn order_store(_config: Option<&DatabaseConfig>) -> Arc<dyn OrderRepository> {
    tracing::info!("Running without postgres feature - using in-memory order store");
    Arc::new(InMemoryOrderRepository::new())
}

#[cfg(feature = "mongo")]
async fn menu_store(config: Option<&MongoConfig>) -> Arc<dyn MenuRepository> {
    let Some(config) = config else {
        tracing::warn!("MONGODB_URI not set. Menu catalog is kept in memory.");
        return Arc::new(InMemoryMenuRepository::new());
    };

    match MongoMenuRepository::connect(config).await {
        Ok(repo) => Arc::new(repo),
        Err(e) => {
            tracing::error!(
                "Failed to connect to menu store: {}. Using in-memory fallback.",
                e
            );
            Arc::new(InMemoryMenuRepository::new())
        }
    }
}

#[cfg(not(feature = "mongo"))]
async fn menu_store(_config: Option<&MongoConfig>) -> Arc<dyn MenuRepository> {
    tracing::info!("Running without mongo feature - using in-memory menu store");
    Arc::new(InMemoryMenuRepository::new())
}

fn local_limiter(policy: &RateLimitConfig) -> Arc<dyn RateLimiter> {
    let limiter = Arc::new(InMemoryRateLimiter::new(policy.clone()));
    limiter.spawn_purge(PURGE_INTERVAL);
    limiter
}

#[cfg(feature = "redis")]
async fn rate_limiter(redis_url: Option<&str>, policy: &RateLimitConfig) -> Arc<dyn RateLimiter> {
    let Some(url) = redis_url else {
        return local_limiter(policy);
    };

    match RedisRateLimiter::new(RedisRateLimitConfig::new(url, policy.clone())).await {
        Ok(limiter) => Arc::new(limiter),
        Err(e) => {
            tracing::error!(
                "Failed to connect to Redis: {}. Rate limiting per instance.",
                e
            );
            local_limiter(policy)
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn rate_limiter(_redis_url: Option<&str>, policy: &RateLimitConfig) -> Arc<dyn RateLimiter> {
    local_limiter(policy)
}
