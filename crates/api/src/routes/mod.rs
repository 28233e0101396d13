pub mod affiliates;
pub mod coupons;
pub mod health;
pub mod integrations;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /coupons                                   list (GET), add (POST)
/// /coupons/count                             count (GET)
/// /coupons/generate-code                     generate a code (POST)
/// /coupons/by/{column}/{value}               lookup by column (GET)
/// /coupons/{reference}                       lookup by id or code (GET)
///
/// /affiliates/{id}/coupon                    update affiliate coupon (PUT)
/// /affiliates/{id}/coupons                   aggregated coupons (GET)
/// /affiliates/{id}/coupons/{reference}       one affiliate coupon (GET)
/// /affiliates/{id}/coupons/{coupon_id}/code  affiliate coupon code (GET)
/// /affiliates/{id}/dashboard/coupons         dashboard table (GET)
///
/// /integrations                              list with filters (GET)
/// /integrations/dynamic-coupons/setup        dynamic coupon readiness (GET)
/// /coupon-types                              coupon types and labels (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/coupons", coupons::router())
        .nest("/affiliates", affiliates::router())
        .merge(integrations::router())
}
