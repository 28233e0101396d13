//! Repository for the `coupon_events` table.

use sqlx::PgPool;

use coupons_core::types::DbId;

use crate::models::coupon_event::CouponEvent;

/// Column list for `coupon_events` queries.
const COLUMNS: &str = "id, event_type, coupon_id, affiliate_id, payload, created_at";

/// Provides append and read operations for persisted coupon events.
pub struct CouponEventRepo;

impl CouponEventRepo {
    /// Insert a new event row, returning the generated ID.
    pub async fn insert(
        pool: &PgPool,
        event_type: &str,
        coupon_id: Option<DbId>,
        affiliate_id: Option<DbId>,
        payload: &serde_json::Value,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO coupon_events (event_type, coupon_id, affiliate_id, payload) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id",
        )
        .bind(event_type)
        .bind(coupon_id)
        .bind(affiliate_id)
        .bind(payload)
        .fetch_one(pool)
        .await
    }

    /// List events for one coupon, oldest first.
    pub async fn list_for_coupon(
        pool: &PgPool,
        coupon_id: DbId,
    ) -> Result<Vec<CouponEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM coupon_events WHERE coupon_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, CouponEvent>(&query)
            .bind(coupon_id)
            .fetch_all(pool)
            .await
    }

    /// List recent events newest first.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CouponEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM coupon_events ORDER BY id DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, CouponEvent>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
