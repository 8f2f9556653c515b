//! Input validation.
//!
//! Each validator runs a fixed list of independent checks over a loosely
//! typed input and concatenates every violation it finds, so a caller can
//! report all problems in a single response. A validator either returns a
//! fully normalized value or the complete list of [`FieldError`]s.

mod menu;
mod order;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use menu::{MenuItemInput, validate_menu_item, validate_menu_patch};
pub use order::{OrderInput, validate_order};

/// One validation violation, addressed by its field path (e.g. `items[2].quantity`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

type Checked<T> = Result<T, Vec<FieldError>>;

/// Move a check's errors into `errors`, keeping its value on success.
fn collect<T>(checked: Checked<T>, errors: &mut Vec<FieldError>) -> Option<T> {
    match checked {
        Ok(value) => Some(value),
        Err(mut found) => {
            errors.append(&mut found);
            None
        }
    }
}

fn fail<T>(field: impl Into<String>, message: impl Into<String>) -> Checked<T> {
    Err(vec![FieldError::new(field, message)])
}

/// Trimmed text of a loosely typed field. Absent and `null` are `None`; any
/// other non-string value is reported with `message`.
fn text<'a>(
    value: Option<&'a Value>,
    field: &str,
    message: &str,
) -> Checked<Option<&'a str>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.trim())),
        Some(_) => fail(field, message),
    }
}

/// Trimmed, non-empty text.
fn required_text(value: Option<&Value>, field: &str, message: &str) -> Checked<String> {
    match text(value, field, message)? {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => fail(field, message),
    }
}

/// A finite JSON number that is not negative.
fn non_negative_number(value: Option<&Value>, field: &str, message: &str) -> Checked<f64> {
    match value.and_then(Value::as_f64) {
        Some(number) if number.is_finite() && number >= 0.0 => Ok(number),
        _ => fail(field, message),
    }
}
