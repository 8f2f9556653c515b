//! Order entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use diner_core::RepoError;
use diner_core::domain::{NewOrder, Order, OrderStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub customer_name: String,
    pub phone_number: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub items: Json,
    pub total_amount: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Insertable row for a validated order; the id is left to the database.
    pub fn from_new(order: NewOrder, now: chrono::DateTime<chrono::Utc>) -> Result<Self, RepoError> {
        let items = serde_json::to_value(&order.items)
            .map_err(|e| RepoError::Query(format!("Unencodable order items: {e}")))?;

        Ok(Self {
            customer_name: Set(order.customer_name),
            phone_number: Set(order.phone_number.into()),
            items: Set(items),
            total_amount: Set(order.total_amount),
            notes: Set(order.notes),
            status: Set(order.status.as_str().to_string()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        })
    }
}

/// Conversion from SeaORM Model to domain Order.
impl TryFrom<Model> for Order {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let items = serde_json::from_value(model.items)
            .map_err(|e| RepoError::Query(format!("Corrupt items for order {}: {e}", model.id)))?;
        let status = model
            .status
            .parse::<OrderStatus>()
            .map_err(|e| RepoError::Query(format!("Corrupt status for order {}: {e}", model.id)))?;

        Ok(Self {
            id: model.id,
            customer_name: model.customer_name,
            phone_number: model.phone_number,
            items,
            total_amount: model.total_amount,
            notes: model.notes,
            status,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}
