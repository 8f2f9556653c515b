//! Menu catalog persistence.

mod memory;
#[cfg(feature = "mongo")]
mod mongo;

pub use memory::InMemoryMenuRepository;
#[cfg(feature = "mongo")]
pub use mongo::MongoMenuRepository;

/// Connection settings for the menu document store.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl MongoConfig {
    pub const DEFAULT_DATABASE: &'static str = "digitaldiner";
}
