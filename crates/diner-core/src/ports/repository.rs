use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{
    Category, MenuItem, MenuItemPatch, NewMenuItem, NewOrder, Order, OrderStatus, PhoneNumber,
    group_by_category,
};
use crate::error::RepoError;

/// Persistence for placed orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Store a validated order and return it with its assigned id.
    async fn create(&self, order: NewOrder) -> Result<Order, RepoError>;

    /// All orders for a canonical phone number, newest first.
    async fn list_by_phone(&self, phone: &PhoneNumber) -> Result<Vec<Order>, RepoError>;

    /// Overwrite an order's status. Fails with [`RepoError::NotFound`] for unknown ids.
    async fn update_status(&self, id: i32, status: OrderStatus) -> Result<Order, RepoError>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> Result<(), RepoError>;
}

/// Persistence for the menu catalog.
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Items with `isAvailable = true`.
    async fn list_available(&self) -> Result<Vec<MenuItem>, RepoError>;

    async fn create(&self, item: NewMenuItem) -> Result<MenuItem, RepoError>;

    async fn update(&self, id: &str, patch: MenuItemPatch) -> Result<MenuItem, RepoError>;

    async fn delete(&self, id: &str) -> Result<(), RepoError>;

    /// Remove every item. Only the seeding tool calls this.
    async fn clear(&self) -> Result<u64, RepoError>;

    /// Available items grouped by category, in menu order.
    async fn list_available_grouped(
        &self,
    ) -> Result<BTreeMap<Category, Vec<MenuItem>>, RepoError> {
        Ok(group_by_category(self.list_available().await?))
    }
}
