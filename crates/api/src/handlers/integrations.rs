//! Handlers for integration and coupon type metadata.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use coupons_core::coupons::coupon_type_labels;
use coupons_core::integrations::IntegrationFilter;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::services::coupons as service;
use crate::state::AppState;

/// GET /api/v1/integrations?supports=dynamic_coupons&status=enabled
pub async fn list_integrations(
    State(state): State<AppState>,
    Query(filter): Query<IntegrationFilter>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.registry.query(&filter),
    }))
}

#[derive(Debug, Serialize)]
pub struct DynamicSetup {
    pub is_setup: bool,
}

/// GET /api/v1/integrations/dynamic-coupons/setup
pub async fn dynamic_coupons_setup(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let is_setup = service::dynamic_coupons_is_setup(&state).await?;
    Ok(Json(DataResponse {
        data: DynamicSetup { is_setup },
    }))
}

#[derive(Debug, Serialize)]
pub struct CouponTypeLabel {
    pub id: &'static str,
    pub label: &'static str,
}

/// GET /api/v1/coupon-types
pub async fn list_coupon_types() -> AppResult<impl IntoResponse> {
    let types: Vec<CouponTypeLabel> = coupon_type_labels()
        .into_iter()
        .map(|(id, label)| CouponTypeLabel { id, label })
        .collect();
    Ok(Json(DataResponse { data: types }))
}
