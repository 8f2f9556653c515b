//! PostgreSQL order store.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder, Select,
    Set,
};

use diner_core::RepoError;
use diner_core::domain::{NewOrder, Order, OrderStatus, PhoneNumber};
use diner_core::ports::OrderRepository;

use super::entity::order::{self, Entity as OrderEntity};

/// Orders table on PostgreSQL.
pub struct PostgresOrderRepository {
    db: DbConn,
}

impl PostgresOrderRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// Orders for one phone number, newest first. Ids break creation-time ties.
pub(crate) fn by_phone_newest_first(phone: &str) -> Select<OrderEntity> {
    OrderEntity::find()
        .filter(order::Column::PhoneNumber.eq(phone))
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
}

fn query_error(e: DbErr) -> RepoError {
    match e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(e.to_string()),
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        _ => RepoError::Query(e.to_string()),
    }
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order, RepoError> {
        let row = order::ActiveModel::from_new(order, Utc::now())?
            .insert(&self.db)
            .await
            .map_err(query_error)?;

        tracing::info!(order_id = row.id, "Order stored");
        Order::try_from(row)
    }

    async fn list_by_phone(&self, phone: &PhoneNumber) -> Result<Vec<Order>, RepoError> {
        tracing::debug!(phone = %phone.masked(), "Finding orders by phone number");

        by_phone_newest_first(phone.as_str())
            .all(&self.db)
            .await
            .map_err(query_error)?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }

    async fn update_status(&self, id: i32, status: OrderStatus) -> Result<Order, RepoError> {
        let row = OrderEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?
            .ok_or(RepoError::NotFound)?;

        let mut active: order::ActiveModel = row.into();
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(Utc::now().into());

        let row = active.update(&self.db).await.map_err(query_error)?;
        tracing::info!(order_id = id, status = %status, "Order status updated");
        Order::try_from(row)
    }

    async fn ping(&self) -> Result<(), RepoError> {
        self.db
            .ping()
            .await
            .map_err(|e| RepoError::Connection(e.to_string()))
    }
}
