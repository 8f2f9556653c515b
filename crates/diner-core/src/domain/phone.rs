//! Customer phone numbers.
//!
//! Every phone number that reaches a store goes through [`normalize`], so the
//! persisted value and the lookup key always share the `DDD-DDD-DDDD` form.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DIGITS: usize = 10;

/// Why a raw phone number was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPhoneNumber {
    #[error("Phone number must contain exactly 10 digits (found {0})")]
    WrongLength(usize),

    #[error("Phone number cannot be all the same digit")]
    RepeatedDigit,
}

/// Validate a customer-supplied phone number and return its canonical form.
///
/// Every non-digit character is dropped first, so `"(555) 123-4567"`,
/// `"555.123.4567"` and `"5551234567"` all yield `"555-123-4567"`.
/// Normalizing an already canonical number returns it unchanged.
pub fn normalize(raw: &str) -> Result<String, InvalidPhoneNumber> {
    let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() != DIGITS {
        return Err(InvalidPhoneNumber::WrongLength(digits.len()));
    }
    if digits.iter().all(|d| *d == digits[0]) {
        return Err(InvalidPhoneNumber::RepeatedDigit);
    }

    let area: String = digits[..3].iter().collect();
    let exchange: String = digits[3..6].iter().collect();
    let line: String = digits[6..].iter().collect();

    Ok(format!("{area}-{exchange}-{line}"))
}

/// A phone number known to be in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, InvalidPhoneNumber> {
        normalize(raw).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log-safe rendering that keeps only the last four digits.
    pub fn masked(&self) -> String {
        format!("***-***-{}", &self.0[8..])
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = InvalidPhoneNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
