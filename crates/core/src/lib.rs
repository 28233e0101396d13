//! Domain logic for affiliate coupons.
//!
//! This crate has no database or HTTP dependencies: query normalization,
//! code handling, the integration registry, aggregation, and the dashboard
//! view are all pure (or only await integration trait objects), so they can
//! be shared by the repository layer, the API, and tests.

pub mod aggregation;
pub mod coupon_code;
pub mod coupon_query;
pub mod coupons;
pub mod dashboard;
pub mod error;
pub mod hashing;
pub mod hooks;
pub mod integrations;
pub mod types;
