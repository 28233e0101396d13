//! Route definitions for integration and coupon type metadata.

use axum::routing::get;
use axum::Router;

use crate::handlers::integrations;
use crate::state::AppState;

/// ```text
/// GET /integrations                        -> list_integrations
/// GET /integrations/dynamic-coupons/setup  -> dynamic_coupons_setup
/// GET /coupon-types                        -> list_coupon_types
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/integrations", get(integrations::list_integrations))
        .route(
            "/integrations/dynamic-coupons/setup",
            get(integrations::dynamic_coupons_setup),
        )
        .route("/coupon-types", get(integrations::list_coupon_types))
}
