//! In-memory menu store - used when no document store is configured.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use diner_core::RepoError;
use diner_core::domain::{MenuItem, MenuItemPatch, NewMenuItem};
use diner_core::ports::MenuRepository;

#[derive(Default)]
struct Catalog {
    items: Vec<MenuItem>,
    issued: u64,
}

/// Menu items kept in insertion order. Ids mimic 24-hex document ids.
#[derive(Default)]
pub struct InMemoryMenuRepository {
    catalog: RwLock<Catalog>,
}

impl InMemoryMenuRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MenuRepository for InMemoryMenuRepository {
    async fn list_available(&self) -> Result<Vec<MenuItem>, RepoError> {
        let catalog = self.catalog.read().await;
        Ok(catalog
            .items
            .iter()
            .filter(|item| item.is_available)
            .cloned()
            .collect())
    }

    async fn create(&self, item: NewMenuItem) -> Result<MenuItem, RepoError> {
        let mut catalog = self.catalog.write().await;
        catalog.issued += 1;

        let stored = MenuItem::from_new(format!("{:024x}", catalog.issued), item, Utc::now());
        catalog.items.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &str, patch: MenuItemPatch) -> Result<MenuItem, RepoError> {
        let mut catalog = self.catalog.write().await;
        let item = catalog
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(RepoError::NotFound)?;

        item.apply(patch, Utc::now());
        Ok(item.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let mut catalog = self.catalog.write().await;
        let before = catalog.items.len();
        catalog.items.retain(|item| item.id != id);

        if catalog.items.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<u64, RepoError> {
        let mut catalog = self.catalog.write().await;
        let removed = catalog.items.len() as u64;
        catalog.items.clear();
        Ok(removed)
    }
}
