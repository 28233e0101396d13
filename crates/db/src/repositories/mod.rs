//! Repository structs with async query methods.
//!
//! Each repository is a zero-sized struct whose methods take `&PgPool`.

pub mod affiliate_repo;
pub mod coupon_event_repo;
pub mod coupon_repo;
pub mod settings_repo;

pub use affiliate_repo::AffiliateRepo;
pub use coupon_event_repo::CouponEventRepo;
pub use coupon_repo::CouponRepo;
pub use settings_repo::SettingsRepo;
