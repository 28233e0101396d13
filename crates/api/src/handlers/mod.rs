pub mod affiliates;
pub mod coupons;
pub mod integrations;
