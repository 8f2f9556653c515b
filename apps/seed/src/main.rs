//! # Menu Seeder
//!
//! Replaces the menu catalog with the bundled sample menu. Every entry goes
//! through the same validation as the admin endpoints before anything is
//! written.

use std::process::ExitCode;

use diner_core::domain::NewMenuItem;
use diner_core::ports::MenuRepository;
use diner_core::validation::{MenuItemInput, validate_menu_item};
use diner_core::{FieldError, RepoError};
use diner_infra::{MongoConfig, MongoMenuRepository};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const CATALOG: &str = include_str!("catalog.json");

#[derive(Debug, Error)]
enum SeedError {
    #[error("Catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog entry {index} is invalid: {errors:?}")]
    Invalid {
        index: usize,
        errors: Vec<FieldError>,
    },

    #[error("MONGODB_URI is not set")]
    MissingUri,

    #[error("Menu store error: {0}")]
    Store(#[from] RepoError),
}

fn load_catalog(raw: &str) -> Result<Vec<NewMenuItem>, SeedError> {
    let inputs: Vec<MenuItemInput> = serde_json::from_str(raw)?;
    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| {
            validate_menu_item(input).map_err(|errors| SeedError::Invalid { index, errors })
        })
        .collect()
}

/// Clear the store, then insert `items` in order.
async fn seed(store: &dyn MenuRepository, items: Vec<NewMenuItem>) -> Result<usize, SeedError> {
    let removed = store.clear().await?;
    tracing::info!(removed, "Cleared menu catalog");

    let count = items.len();
    for item in items {
        let created = store.create(item).await?;
        tracing::debug!(id = %created.id, name = %created.name, "Inserted menu item");
    }
    Ok(count)
}

async fn run() -> Result<usize, SeedError> {
    // Validate before touching the store
    let items = load_catalog(CATALOG)?;

    let config = MongoConfig {
        uri: std::env::var("MONGODB_URI").map_err(|_| SeedError::MissingUri)?,
        database: std::env::var("MONGODB_DATABASE")
            .unwrap_or_else(|_| MongoConfig::DEFAULT_DATABASE.to_string()),
    };
    let store = MongoMenuRepository::connect(&config).await?;

    seed(&store, items).await
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(count) => {
            tracing::info!(count, "Menu catalog seeded");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Seeding failed");
            ExitCode::FAILURE
        }
    }
}
