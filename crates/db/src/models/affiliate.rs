//! Affiliate entity model.

use serde::Serialize;
use sqlx::FromRow;

use coupons_core::types::{DbId, Timestamp};

/// Status value of an affiliate in good standing.
pub const STATUS_ACTIVE: &str = "active";

/// A row from the `affiliates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Affiliate {
    pub affiliate_id: DbId,
    pub user_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
}
