//! Query result cache for coupon lookups.
//!
//! Entries are keyed by the query digest plus a last-changed token. Any
//! write bumps the token, so stale entries are never read again and simply
//! age out through the TTL.

use std::future::Future;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::models::coupon::CouponQueryResult;

/// Default lifetime of a cached result.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Default maximum number of cached results.
pub const DEFAULT_CAPACITY: u64 = 10_000;

/// A cached query answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedResult {
    List(CouponQueryResult),
    Count(i64),
}

/// Concurrent result cache with a monotonic last-changed token.
#[derive(Debug, Clone)]
pub struct QueryCache {
    inner: Cache<String, CachedResult>,
    last_changed: Arc<AtomicI64>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

impl QueryCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
            last_changed: Arc::new(AtomicI64::new(now_micros())),
        }
    }

    /// Current last-changed token.
    pub fn last_changed(&self) -> String {
        self.last_changed.load(Ordering::Acquire).to_string()
    }

    /// Mark the coupon table as changed. The token strictly increases.
    pub fn bump(&self) {
        let now = now_micros();
        // fetch_update only fails when the closure returns None.
        let _ = self
            .last_changed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(now.max(prev + 1))
            });
    }

    pub async fn get(&self, key: &str) -> Option<CachedResult> {
        self.inner.get(key).await
    }

    pub async fn insert(&self, key: String, value: CachedResult) {
        self.inner.insert(key, value).await;
    }

    /// Return the cached value for `key`, or compute and store it.
    ///
    /// Errors are returned without caching anything.
    pub async fn try_get_or_insert_with<E, F, Fut>(
        &self,
        key: String,
        f: F,
    ) -> Result<CachedResult, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachedResult, E>>,
    {
        if let Some(cached) = self.get(&key).await {
            tracing::trace!(key = %key, "Coupon query cache hit");
            return Ok(cached);
        }

        let value = f().await?;
        self.insert(key, value.clone()).await;
        Ok(value)
    }
}

fn now_micros() -> i64 {
    chrono::Utc::now().timestamp_micros()
}
