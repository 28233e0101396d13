//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row and, where the table is written through the API, the
//! `Deserialize` DTOs used for inserts and patches.

pub mod affiliate;
pub mod coupon;
pub mod coupon_event;
pub mod setting;
