//! Cached coupon store.
//!
//! Wraps [`CouponRepo`] with the [`QueryCache`]: list and count queries are
//! cached under their normalized digest, and every write bumps the
//! last-changed token.

use coupons_core::coupon_query::{CouponColumn, CouponQueryArgs};
use coupons_core::types::DbId;

use crate::cache::{CachedResult, QueryCache};
use crate::models::coupon::{Coupon, CouponQueryResult};
use crate::repositories::CouponRepo;
use crate::DbPool;

/// Coupon storage with query caching.
#[derive(Debug, Clone)]
pub struct CouponStore {
    pool: DbPool,
    cache: QueryCache,
}

impl CouponStore {
    pub fn new(pool: DbPool, cache: QueryCache) -> Self {
        Self { pool, cache }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// List coupons matching `args`.
    pub async fn get_coupons(&self, args: &CouponQueryArgs) -> Result<CouponQueryResult, sqlx::Error> {
        let query = args.normalize();
        let key = query.cache_key(false, &self.cache.last_changed());
        let (pool, q) = (&self.pool, &query);

        let cached = self
            .cache
            .try_get_or_insert_with(key, || async move {
                CouponRepo::list(pool, q).await.map(CachedResult::List)
            })
            .await?;

        match cached {
            CachedResult::List(result) => Ok(result),
            CachedResult::Count(_) => CouponRepo::list(&self.pool, &query).await,
        }
    }

    /// Count coupons matching `args`, ignoring pagination.
    pub async fn count(&self, args: &CouponQueryArgs) -> Result<i64, sqlx::Error> {
        let query = args.normalize();
        let key = query.cache_key(true, &self.cache.last_changed());
        let (pool, q) = (&self.pool, &query);

        let cached = self
            .cache
            .try_get_or_insert_with(key, || async move {
                CouponRepo::count(pool, q).await.map(CachedResult::Count)
            })
            .await?;

        match cached {
            CachedResult::Count(count) => Ok(count),
            CachedResult::List(_) => CouponRepo::count(&self.pool, &query).await,
        }
    }

    /// Fetch one coupon by id.
    pub async fn get_object(&self, coupon_id: DbId) -> Result<Option<Coupon>, sqlx::Error> {
        CouponRepo::find_by_id(&self.pool, coupon_id).await
    }

    /// Fetch the first coupon whose `column` equals `value`.
    pub async fn get_by(&self, column: CouponColumn, value: &str) -> Result<Option<Coupon>, sqlx::Error> {
        CouponRepo::find_by(&self.pool, column, value).await
    }

    /// Insert a sanitized coupon and invalidate cached queries.
    pub async fn insert(&self, affiliate_id: DbId, coupon_code: &str) -> Result<Coupon, sqlx::Error> {
        let coupon = CouponRepo::insert(&self.pool, affiliate_id, coupon_code).await?;
        self.cache.bump();
        Ok(coupon)
    }

    /// Replace a coupon's code and invalidate cached queries.
    pub async fn update_code(
        &self,
        coupon_id: DbId,
        coupon_code: &str,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        let updated = CouponRepo::update_code(&self.pool, coupon_id, coupon_code).await?;
        if updated.is_some() {
            self.cache.bump();
        }
        Ok(updated)
    }
}
