use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PhoneNumber;

/// Lifecycle state of an order.
///
/// Transitions are unconstrained: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [Self::Pending, Self::Completed, Self::Cancelled];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Status must be one of PENDING, COMPLETED, CANCELLED (got {0:?})")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// One line of an order, as captured at ordering time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "_id")]
    pub item_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

/// A validated order that has not been stored yet.
///
/// Only [`crate::validation::validate_order`] produces one, so `status` is
/// always [`OrderStatus::Pending`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer_name: String,
    pub phone_number: PhoneNumber,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub notes: Option<String>,
    pub status: OrderStatus,
}

/// A stored order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i32,
    pub customer_name: String,
    pub phone_number: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub notes: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Materialize a stored order from a validated one.
    pub fn from_new(id: i32, order: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            customer_name: order.customer_name,
            phone_number: order.phone_number.into(),
            items: order.items,
            total_amount: order.total_amount,
            notes: order.notes,
            status: order.status,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("pending".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        assert_eq!("COMPLETED".parse::<OrderStatus>(), Ok(OrderStatus::Completed));
        assert_eq!(" Cancelled ".parse::<OrderStatus>(), Ok(OrderStatus::Cancelled));
        assert!("SHIPPED".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"CANCELLED\""
        );
    }

    #[test]
    fn order_serializes_camel_case_with_item_ids() {
        let now = Utc::now();
        let order = Order::from_new(
            7,
            NewOrder {
                customer_name: "Jo".to_string(),
                phone_number: PhoneNumber::parse("5551234567").unwrap(),
                items: vec![OrderItem {
                    item_id: "1".to_string(),
                    name: "Tea".to_string(),
                    price: 79.0,
                    quantity: 1,
                }],
                total_amount: 79.0,
                notes: None,
                status: OrderStatus::Pending,
            },
            now,
        );

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["customerName"], "Jo");
        assert_eq!(json["phoneNumber"], "555-123-4567");
        assert_eq!(json["items"][0]["_id"], "1");
        assert_eq!(json["status"], "PENDING");
    }
}
