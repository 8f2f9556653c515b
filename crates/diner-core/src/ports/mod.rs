//! Ports - trait definitions for external dependencies.
//! The infrastructure crate provides the concrete stores and limiters.

mod rate_limit;
mod repository;

pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{MenuRepository, OrderRepository};
