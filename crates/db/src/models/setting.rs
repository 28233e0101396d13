//! Settings entity model.

use serde::Serialize;
use sqlx::FromRow;

use coupons_core::types::Timestamp;

/// A row from the `settings` key/value table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Setting {
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: Timestamp,
}
