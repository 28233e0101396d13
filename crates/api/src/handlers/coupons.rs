//! Handlers for coupon queries, creation and code generation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use coupons_core::coupon_query::{CouponColumn, CouponQueryArgs, OneOrMany};
use coupons_core::coupons::CouponReference;
use coupons_core::error::CoreError;
use coupons_core::types::DbId;
use coupons_db::models::coupon::CreateCoupon;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, SuccessResponse};
use crate::services::coupons as service;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query-string form of the coupon query configuration.
///
/// List-valued parameters are comma-separated (`coupon_id=1,2,3`).
#[derive(Debug, Default, Deserialize)]
pub struct CouponListParams {
    pub number: Option<i64>,
    pub offset: Option<i64>,
    pub coupon_id: Option<String>,
    pub affiliate_id: Option<String>,
    pub coupon_code: Option<String>,
    pub orderby: Option<String>,
    pub order: Option<String>,
    pub fields: Option<String>,
}

impl CouponListParams {
    pub fn into_args(self) -> AppResult<CouponQueryArgs> {
        Ok(CouponQueryArgs {
            number: self.number,
            offset: self.offset,
            coupon_id: self.coupon_id.as_deref().map(parse_id_list).transpose()?,
            affiliate_id: self.affiliate_id.as_deref().map(parse_id_list).transpose()?,
            coupon_code: self.coupon_code.as_deref().map(split_list),
            orderby: self.orderby,
            order: self.order,
            fields: self.fields.as_deref().map(split_list),
        })
    }
}

fn split_list(raw: &str) -> OneOrMany<String> {
    let mut items: Vec<String> = raw.split(',').map(|s| s.trim().to_string()).collect();
    if items.len() == 1 {
        OneOrMany::One(items.remove(0))
    } else {
        OneOrMany::Many(items)
    }
}

fn parse_id_list(raw: &str) -> AppResult<OneOrMany<DbId>> {
    let ids = raw
        .split(',')
        .map(|s| {
            s.trim()
                .parse::<DbId>()
                .map_err(|_| AppError::BadRequest(format!("Invalid id '{}'", s.trim())))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(match <[DbId; 1]>::try_from(ids) {
        Ok([id]) => OneOrMany::One(id),
        Err(ids) => OneOrMany::Many(ids),
    })
}

// ---------------------------------------------------------------------------
// Query endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/coupons
pub async fn list_coupons(
    State(state): State<AppState>,
    Query(params): Query<CouponListParams>,
) -> AppResult<impl IntoResponse> {
    let args = params.into_args()?;
    let coupons = state.store.get_coupons(&args).await?;
    Ok(Json(DataResponse { data: coupons }))
}

/// GET /api/v1/coupons/count
pub async fn count_coupons(
    State(state): State<AppState>,
    Query(params): Query<CouponListParams>,
) -> AppResult<impl IntoResponse> {
    let args = params.into_args()?;
    let count = state.store.count(&args).await?;
    Ok(Json(DataResponse { data: count }))
}

/// GET /api/v1/coupons/{reference}
///
/// Numeric references are coupon ids; anything else is a code. A code made
/// only of digits is reachable through `/coupons/by/coupon_code/{value}`.
pub async fn get_coupon(
    State(state): State<AppState>,
    Path(reference): Path<String>,
) -> AppResult<impl IntoResponse> {
    let coupon = service::get_coupon(&state, &CouponReference::parse(&reference))
        .await?
        .ok_or(AppError::CouponNotFound(reference))?;
    Ok(Json(DataResponse { data: coupon }))
}

/// GET /api/v1/coupons/by/{column}/{value}
pub async fn get_coupon_by(
    State(state): State<AppState>,
    Path((column, value)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let column = CouponColumn::from_name(&column)
        .ok_or_else(|| CoreError::Validation(format!("Unknown coupon column '{column}'")))?;
    let coupon = service::get_coupon_by(&state, column, &value)
        .await?
        .ok_or(AppError::CouponNotFound(value))?;
    Ok(Json(DataResponse { data: coupon }))
}

// ---------------------------------------------------------------------------
// Mutation endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/coupons
pub async fn create_coupon(
    State(state): State<AppState>,
    Json(input): Json<CreateCoupon>,
) -> AppResult<impl IntoResponse> {
    let coupon = service::add_coupon(&state, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: coupon })))
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateCodeRequest {
    #[serde(default)]
    pub affiliate_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct GeneratedCode {
    pub coupon_code: String,
}

/// POST /api/v1/coupons/generate-code
///
/// Returns `{ "success": true, "data": { "coupon_code": ... } }`.
pub async fn generate_code(
    State(state): State<AppState>,
    Json(input): Json<GenerateCodeRequest>,
) -> AppResult<impl IntoResponse> {
    let coupon_code = service::generate_code(&state, input.affiliate_id);
    tracing::debug!(affiliate_id = input.affiliate_id, "Generated coupon code");
    Ok(Json(SuccessResponse::ok(GeneratedCode { coupon_code })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_values_stay_scalar() {
        let args = CouponListParams {
            coupon_id: Some("4".into()),
            coupon_code: Some("abc".into()),
            ..Default::default()
        }
        .into_args()
        .unwrap();
        assert_eq!(args.coupon_id, Some(OneOrMany::One(4)));
        assert_eq!(args.coupon_code, Some(OneOrMany::One("abc".to_string())));
    }

    #[test]
    fn comma_separated_values_become_lists() {
        let args = CouponListParams {
            affiliate_id: Some("1, 2".into()),
            fields: Some("coupon_id,coupon_code".into()),
            ..Default::default()
        }
        .into_args()
        .unwrap();
        assert_eq!(args.affiliate_id, Some(OneOrMany::Many(vec![1, 2])));
        assert_eq!(
            args.fields,
            Some(OneOrMany::Many(vec![
                "coupon_id".to_string(),
                "coupon_code".to_string()
            ]))
        );
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let result = CouponListParams {
            coupon_id: Some("x".into()),
            ..Default::default()
        }
        .into_args();
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
