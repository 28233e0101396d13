//! Handlers for affiliate-scoped coupon operations.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use coupons_core::coupons::{CouponReference, CouponType};
use coupons_core::types::DbId;
use coupons_db::models::coupon::UpdateCoupon;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::services::coupons as service;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UpdateResult {
    pub updated: bool,
}

/// PUT /api/v1/affiliates/{id}/coupon
///
/// Replaces the code of the affiliate's most recent coupon.
pub async fn update_coupon(
    State(state): State<AppState>,
    Path(affiliate_id): Path<DbId>,
    Json(input): Json<UpdateCoupon>,
) -> AppResult<impl IntoResponse> {
    let updated = service::update_affiliate_coupon(&state, affiliate_id, &input).await?;
    Ok(Json(DataResponse {
        data: UpdateResult { updated },
    }))
}

#[derive(Debug, Deserialize)]
pub struct AffiliateCouponsParams {
    #[serde(rename = "type")]
    pub coupon_type: Option<String>,
    #[serde(default = "details_only_default")]
    pub details_only: bool,
}

fn details_only_default() -> bool {
    true
}

/// GET /api/v1/affiliates/{id}/coupons[?type=manual|dynamic&details_only=false]
///
/// Without `type`, both categories under `manual` / `dynamic` keys. Coupons
/// come back as code/amount details unless `details_only=false` asks for the
/// providers' own objects.
pub async fn list_coupons(
    State(state): State<AppState>,
    Path(affiliate_id): Path<DbId>,
    Query(params): Query<AffiliateCouponsParams>,
) -> AppResult<axum::response::Response> {
    match params.coupon_type.as_deref() {
        Some(raw) => {
            let coupon_type = CouponType::from_str(raw)?;
            let coupons =
                service::coupons_of_type(&state, coupon_type, affiliate_id, params.details_only)
                    .await?;
            Ok(Json(DataResponse { data: coupons }).into_response())
        }
        None => {
            let coupons =
                service::affiliate_coupons(&state, affiliate_id, params.details_only).await?;
            Ok(Json(DataResponse { data: coupons }).into_response())
        }
    }
}

/// GET /api/v1/affiliates/{id}/coupons/{reference}
///
/// All-digit references are coupon ids; use `/coupons/by/coupon_code/{value}`
/// for a code made only of digits.
pub async fn get_coupon(
    State(state): State<AppState>,
    Path((affiliate_id, reference)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let coupon =
        service::get_affiliate_coupon(&state, affiliate_id, &CouponReference::parse(&reference))
            .await?;
    Ok(Json(DataResponse { data: coupon }))
}

/// GET /api/v1/affiliates/{id}/coupons/{coupon_id}/code
///
/// An empty string when the coupon id is not numeric or the affiliate or
/// coupon does not resolve.
pub async fn get_coupon_code(
    State(state): State<AppState>,
    Path((affiliate_id, coupon_id)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let code = match coupon_id.parse::<DbId>() {
        Ok(coupon_id) => service::get_affiliate_coupon_code(&state, affiliate_id, coupon_id).await?,
        Err(_) => String::new(),
    };
    Ok(Json(DataResponse { data: code }))
}

/// GET /api/v1/affiliates/{id}/dashboard/coupons
pub async fn dashboard_table(
    State(state): State<AppState>,
    Path(affiliate_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let view = service::coupon_table(&state, affiliate_id).await?;
    Ok(Json(DataResponse { data: view }))
}
