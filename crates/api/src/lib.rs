//! Affiliate coupons API server library.
//!
//! Exposes config, state, error handling, services and routes so the binary
//! entrypoint and the integration tests share them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod integrations;
pub mod response;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
