//! Order persistence.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres_repo;

pub use connections::DatabaseConfig;
pub use memory::InMemoryOrderRepository;

#[cfg(feature = "postgres")]
pub use postgres_repo::PostgresOrderRepository;
