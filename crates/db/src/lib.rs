//! Persistence layer for affiliate coupons.
//!
//! - [`models`]: row structs and request DTOs.
//! - [`repositories`]: zero-sized repository structs with async queries
//!   taking `&PgPool`.
//! - [`cache`]: query result cache with a last-changed token.
//! - [`store`]: [`CouponStore`], the cached coupon store used by the API.

use sqlx::postgres::PgPoolOptions;

pub mod cache;
pub mod models;
pub mod repositories;
pub mod store;

pub use cache::QueryCache;
pub use store::CouponStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
