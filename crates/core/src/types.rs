/// Coupon, affiliate and event ids are PostgreSQL BIGSERIAL / BIGINT.
pub type DbId = i64;

/// Timestamps are stored and serialized in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
