//! Order placement rules.

use serde::Deserialize;
use serde_json::Value;

use super::{Checked, FieldError, collect, fail, non_negative_number, text};
use crate::domain::{NewOrder, OrderItem, OrderStatus, PhoneNumber};

const NAME_MIN_CHARS: usize = 2;
const NAME_MAX_CHARS: usize = 50;
const NOTES_MAX_CHARS: usize = 500;

/// An order as submitted by the client. Nothing here is trusted yet.
///
/// Every field stays as raw JSON so a wrong type becomes a field error
/// instead of rejecting the whole body. Any client-supplied status is
/// ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub customer_name: Option<Value>,
    pub phone_number: Option<Value>,
    pub items: Option<Value>,
    pub total_amount: Option<Value>,
    pub notes: Option<Value>,
}

/// Validate and normalize an order.
///
/// `totalAmount` is taken as submitted; it is not recomputed from the items.
pub fn validate_order(input: &OrderInput) -> Result<NewOrder, Vec<FieldError>> {
    let mut errors = Vec::new();

    let customer_name = collect(check_customer_name(input.customer_name.as_ref()), &mut errors);
    let phone_number = collect(check_phone_number(input.phone_number.as_ref()), &mut errors);
    let items = collect(check_items(input.items.as_ref()), &mut errors);
    let total_amount = collect(
        non_negative_number(
            input.total_amount.as_ref(),
            "totalAmount",
            "Total amount must be a positive number",
        ),
        &mut errors,
    );
    let notes = collect(check_notes(input.notes.as_ref()), &mut errors);

    match (customer_name, phone_number, items, total_amount, notes) {
        (Some(customer_name), Some(phone_number), Some(items), Some(total_amount), Some(notes))
            if errors.is_empty() =>
        {
            Ok(NewOrder {
                customer_name,
                phone_number,
                items,
                total_amount,
                notes,
                status: OrderStatus::Pending,
            })
        }
        _ => Err(errors),
    }
}

fn check_customer_name(value: Option<&Value>) -> Checked<String> {
    let name = text(value, "customerName", "Customer name must be text")?.unwrap_or_default();
    if name.is_empty() {
        return fail("customerName", "Customer name is required");
    }

    let mut errors = Vec::new();
    let length = name.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&length) {
        errors.push(FieldError::new(
            "customerName",
            "Customer name must be between 2 and 50 characters",
        ));
    }
    if !name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        errors.push(FieldError::new(
            "customerName",
            "Customer name can only contain letters and spaces",
        ));
    }

    if errors.is_empty() {
        Ok(name.to_string())
    } else {
        Err(errors)
    }
}

fn check_phone_number(value: Option<&Value>) -> Checked<PhoneNumber> {
    let raw = text(value, "phoneNumber", "Phone number must be text")?.unwrap_or_default();
    if raw.is_empty() {
        return fail("phoneNumber", "Phone number is required");
    }
    PhoneNumber::parse(raw).or_else(|e| fail("phoneNumber", e.to_string()))
}

fn check_items(value: Option<&Value>) -> Checked<Vec<OrderItem>> {
    let elements = match value {
        Some(Value::Array(elements)) if !elements.is_empty() => elements,
        _ => return fail("items", "Order must contain at least one item"),
    };

    let mut errors = Vec::new();
    let items: Vec<OrderItem> = elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| collect(check_line_item(index, element), &mut errors))
        .collect();

    if errors.is_empty() {
        Ok(items)
    } else {
        Err(errors)
    }
}

fn check_line_item(index: usize, element: &Value) -> Checked<OrderItem> {
    let Some(fields) = element.as_object() else {
        return fail(format!("items[{index}]"), "Each item must be an object");
    };
    let path = |field: &str| format!("items[{index}].{field}");

    let item_id = fields
        .get("_id")
        .or_else(|| fields.get("id"))
        .and_then(identifier);
    let name = fields
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let price = fields
        .get("price")
        .and_then(Value::as_f64)
        .filter(|price| price.is_finite() && *price >= 0.0);
    let quantity = fields
        .get("quantity")
        .and_then(whole_number)
        .filter(|quantity| *quantity >= 1);

    let mut errors = Vec::new();
    if item_id.is_none() {
        errors.push(FieldError::new(path("_id"), "Item identifier is required"));
    }
    if name.is_none() {
        errors.push(FieldError::new(path("name"), "Item name is required"));
    }
    if price.is_none() {
        errors.push(FieldError::new(
            path("price"),
            "Item price must be a non-negative number",
        ));
    }
    if quantity.is_none() {
        errors.push(FieldError::new(
            path("quantity"),
            "Item quantity must be a whole number of at least 1",
        ));
    }

    match (item_id, name, price, quantity) {
        (Some(item_id), Some(name), Some(price), Some(quantity)) => Ok(OrderItem {
            item_id,
            name: name.to_string(),
            price,
            quantity,
        }),
        _ => Err(errors),
    }
}

fn check_notes(value: Option<&Value>) -> Checked<Option<String>> {
    let Some(notes) = text(value, "notes", "Notes must be text")? else {
        return Ok(None);
    };
    if notes.chars().count() > NOTES_MAX_CHARS {
        return fail("notes", "Notes cannot exceed 500 characters");
    }
    Ok((!notes.is_empty()).then(|| notes.to_string()))
}

/// Item identifiers arrive as strings (document ids) or plain numbers.
fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn whole_number(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32)
}
