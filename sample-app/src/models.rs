//! Wire types of the inventory API

use std::collections::BTreeMap;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::TimeDelta;
use chrono::Utc;
use typed_oas::Describe;
use typed_oas::EncodeError;
use typed_oas::Value;
use uuid::Uuid;

/// Stock keeping unit
#[derive(Debug, Clone, PartialEq, Eq, Describe)]
pub struct Sku(pub String);

/// Amount in cents, written as a decimal string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Describe)]
#[describe(text = money_text)]
pub struct Money {
    /// Signed amount in cents
    pub cents: i64,
}

impl Money {
    /// Amount as a decimal string with two fractional digits
    pub fn to_decimal(self) -> String {
        let sign = if self.cents < 0 { "-" } else { "" };
        let cents = self.cents.unsigned_abs();
        format!("{sign}{}.{:02}", cents / 100, cents % 100)
    }
}

fn money_text(value: &Value) -> Result<String, EncodeError> {
    let cents = value
        .field(0)
        .and_then(Value::as_i64)
        .ok_or_else(|| EncodeError::shape("cents", value))?;
    Ok(Money { cents }.to_decimal())
}

/// Creation and modification times
#[derive(Debug, Clone, Describe)]
pub struct Audit {
    /// When the resource was created
    pub created_at: DateTime<Utc>,
    /// When the resource was last changed, if ever
    pub updated_at: Option<DateTime<Utc>>,
}

/// Stocked item
#[derive(Debug, Clone, Describe)]
pub struct Item {
    /// Item identifier
    pub id:         Uuid,
    /// Stock keeping unit
    pub sku:        Sku,
    /// Display name
    pub name:       String,
    /// Unit price
    pub price:      Money,
    /// Free-form labels
    pub tags:       Vec<String>,
    /// Next expected delivery
    pub restock_on: Option<NaiveDate>,
    /// Vendor specific attributes
    pub attributes: BTreeMap<String, String>,
    /// Audit times, written inline
    #[describe(embed)]
    pub audit:      Audit,
}

/// Payload creating an item
#[derive(Debug, Clone, Describe)]
pub struct NewItem {
    /// Stock keeping unit
    pub sku:   Sku,
    /// Display name
    pub name:  String,
    /// Unit price
    pub price: Money,
    /// Free-form labels
    pub tags:  Vec<String>,
}

/// One page of a listing
#[derive(Debug, Clone, Describe)]
pub struct ItemPage {
    /// Items of this page
    pub items:       Vec<Item>,
    /// Cursor of the next page, absent on the last one
    pub next_cursor: Option<String>,
    /// Number of items across all pages
    pub total:       u64,
}

/// Error body of every failed request
#[derive(Debug, Clone, Describe)]
pub struct ApiError {
    /// HTTP status code
    pub code:        u16,
    /// Human readable message
    pub message:     String,
    /// Delay before retrying, for throttled requests
    pub retry_after: Option<TimeDelta>,
}
