//! # Diner Infrastructure
//!
//! Concrete implementations of the ports defined in `diner-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - Order store on PostgreSQL via SeaORM
//! - `mongo` - Menu store on MongoDB
//! - `redis` - Rate limiting shared across instances through Redis

pub mod database;
pub mod menu;
pub mod rate_limit;

// Re-exports - In-Memory
pub use database::{DatabaseConfig, InMemoryOrderRepository};
pub use menu::{InMemoryMenuRepository, MongoConfig};
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

// Re-exports - External stores
#[cfg(feature = "postgres")]
pub use database::PostgresOrderRepository;
#[cfg(feature = "mongo")]
pub use menu::MongoMenuRepository;
#[cfg(feature = "redis")]
pub use rate_limit::{RedisRateLimitConfig, RedisRateLimiter};
