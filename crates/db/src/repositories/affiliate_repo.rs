//! Repository for the `affiliates` table.

use sqlx::PgPool;

use coupons_core::types::DbId;

use crate::models::affiliate::Affiliate;

/// Column list for `affiliates` queries.
const COLUMNS: &str = "affiliate_id, user_id, status, created_at";

/// Provides lookups and inserts for affiliates.
pub struct AffiliateRepo;

impl AffiliateRepo {
    pub async fn find_by_id(
        pool: &PgPool,
        affiliate_id: DbId,
    ) -> Result<Option<Affiliate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM affiliates WHERE affiliate_id = $1");
        sqlx::query_as::<_, Affiliate>(&query)
            .bind(affiliate_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether an affiliate with this id exists.
    pub async fn exists(pool: &PgPool, affiliate_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM affiliates WHERE affiliate_id = $1)")
            .bind(affiliate_id)
            .fetch_one(pool)
            .await
    }

    /// Insert an affiliate for a user.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        status: &str,
    ) -> Result<Affiliate, sqlx::Error> {
        let query = format!(
            "INSERT INTO affiliates (user_id, status) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Affiliate>(&query)
            .bind(user_id)
            .bind(status)
            .fetch_one(pool)
            .await
    }
}
