//! In-memory order store - used when no orders database is configured.
//!
//! Orders are lost on process restart.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use diner_core::RepoError;
use diner_core::domain::{NewOrder, Order, OrderStatus, PhoneNumber};
use diner_core::ports::OrderRepository;

#[derive(Default)]
struct Table {
    rows: Vec<Order>,
    last_id: i32,
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    table: RwLock<Table>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order, RepoError> {
        let mut table = self.table.write().await;
        table.last_id += 1;

        let stored = Order::from_new(table.last_id, order, Utc::now());
        table.rows.push(stored.clone());
        Ok(stored)
    }

    async fn list_by_phone(&self, phone: &PhoneNumber) -> Result<Vec<Order>, RepoError> {
        let table = self.table.read().await;
        let mut orders: Vec<Order> = table
            .rows
            .iter()
            .filter(|order| order.phone_number == phone.as_str())
            .cloned()
            .collect();

        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn update_status(&self, id: i32, status: OrderStatus) -> Result<Order, RepoError> {
        let mut table = self.table.write().await;
        let order = table
            .rows
            .iter_mut()
            .find(|order| order.id == id)
            .ok_or(RepoError::NotFound)?;

        order.status = status;
        order.updated_at = Utc::now();
        Ok(order.clone())
    }

    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}
