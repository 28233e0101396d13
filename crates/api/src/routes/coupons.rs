//! Route definitions for coupons, mounted at `/coupons`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::coupons;
use crate::state::AppState;

/// ```text
/// GET  /                       -> list_coupons
/// POST /                       -> create_coupon
/// GET  /count                  -> count_coupons
/// POST /generate-code          -> generate_code
/// GET  /by/{column}/{value}    -> get_coupon_by
/// GET  /{reference}            -> get_coupon
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(coupons::list_coupons).post(coupons::create_coupon))
        .route("/count", get(coupons::count_coupons))
        .route("/generate-code", post(coupons::generate_code))
        .route("/by/{column}/{value}", get(coupons::get_coupon_by))
        .route("/{reference}", get(coupons::get_coupon))
}
