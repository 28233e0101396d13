//! Operations shared by handlers, composed from the store, registry and hooks.

pub mod coupons;
