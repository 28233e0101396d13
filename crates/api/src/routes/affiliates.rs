//! Route definitions for affiliate coupons, mounted at `/affiliates`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::affiliates;
use crate::state::AppState;

/// ```text
/// PUT /{id}/coupon                     -> update_coupon
/// GET /{id}/coupons                    -> list_coupons
/// GET /{id}/coupons/{reference}        -> get_coupon
/// GET /{id}/coupons/{reference}/code  -> get_coupon_code
/// GET /{id}/dashboard/coupons          -> dashboard_table
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/coupon", put(affiliates::update_coupon))
        .route("/{id}/coupons", get(affiliates::list_coupons))
        .route("/{id}/coupons/{reference}", get(affiliates::get_coupon))
        .route("/{id}/coupons/{reference}/code", get(affiliates::get_coupon_code))
        .route("/{id}/dashboard/coupons", get(affiliates::dashboard_table))
}
