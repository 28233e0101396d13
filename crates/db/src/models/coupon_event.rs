//! Persisted coupon event model.

use serde::Serialize;
use sqlx::FromRow;

use coupons_core::types::{DbId, Timestamp};

/// A row from the `coupon_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CouponEvent {
    pub id: DbId,
    pub event_type: String,
    pub coupon_id: Option<DbId>,
    pub affiliate_id: Option<DbId>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
