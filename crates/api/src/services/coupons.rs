//! Coupon mutations, lookups and affiliate aggregation.

use coupons_core::aggregation::{self, AffiliateCoupons};
use coupons_core::coupon_code::generate_coupon_code;
use coupons_core::coupon_query::{CouponColumn, CouponQueryArgs};
use coupons_core::coupons::{
    prepare_new_code, prepare_updated_code, template_is_configured, validate_add,
    CouponReference, CouponType, COUPON_TEMPLATE_SETTING, EVENT_COUPON_ADDED,
    EVENT_COUPON_UPDATED,
};
use coupons_core::dashboard::{build_coupon_table, CouponTableView};
use coupons_core::integrations::CouponMap;
use coupons_core::types::DbId;
use coupons_db::models::coupon::{Coupon, CreateCoupon, UpdateCoupon};
use coupons_db::repositories::{AffiliateRepo, SettingsRepo};
use coupons_events::PlatformEvent;
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Add a coupon for an affiliate and publish `coupon.added`.
///
/// Requires the coupon template setting (outside test mode) and an existing
/// affiliate. A missing code is generated and run through the code filters.
pub async fn add_coupon(state: &AppState, input: &CreateCoupon) -> AppResult<Coupon> {
    input.validate()?;

    let template = SettingsRepo::get_value(&state.pool, COUPON_TEMPLATE_SETTING).await?;
    let affiliate_exists = AffiliateRepo::exists(&state.pool, input.affiliate_id).await?;
    validate_add(
        template.as_ref(),
        state.config.coupons.test_mode,
        input.affiliate_id,
        affiliate_exists,
    )?;

    let code = prepare_new_code(input.coupon_code.as_deref(), |generated| {
        state.hooks.filter_generated_code(generated, input.affiliate_id)
    })?;

    let coupon = state.store.insert(input.affiliate_id, &code).await?;

    tracing::info!(
        coupon_id = coupon.coupon_id,
        affiliate_id = coupon.affiliate_id,
        coupon_code = %coupon.coupon_code,
        "Coupon added",
    );

    state.event_bus.publish(
        PlatformEvent::new(EVENT_COUPON_ADDED)
            .with_coupon(coupon.coupon_id)
            .with_affiliate(coupon.affiliate_id)
            .with_payload(json!(coupon)),
    );

    Ok(coupon)
}

/// Update the code of the affiliate's most recent coupon.
///
/// Returns `false`, without publishing anything, when the affiliate has no
/// coupon. A missing code keeps the current one.
pub async fn update_affiliate_coupon(
    state: &AppState,
    affiliate_id: DbId,
    input: &UpdateCoupon,
) -> AppResult<bool> {
    input.validate()?;

    let Some(old) = most_recent_coupon(state, affiliate_id).await? else {
        tracing::debug!(affiliate_id, "No coupon to update for affiliate");
        return Ok(false);
    };

    let code = prepare_updated_code(input.coupon_code.as_deref())?
        .unwrap_or_else(|| old.coupon_code.clone());

    let new = state.store.update_code(old.coupon_id, &code).await?;
    let updated = new.is_some();

    tracing::info!(
        coupon_id = old.coupon_id,
        affiliate_id,
        updated,
        "Coupon updated",
    );

    state.event_bus.publish(
        PlatformEvent::new(EVENT_COUPON_UPDATED)
            .with_coupon(old.coupon_id)
            .with_affiliate(affiliate_id)
            .with_payload(json!({
                "new": new,
                "old": old,
                "updated": updated,
            })),
    );

    Ok(updated)
}

async fn most_recent_coupon(state: &AppState, affiliate_id: DbId) -> AppResult<Option<Coupon>> {
    if affiliate_id <= 0 {
        return Ok(None);
    }
    let args = CouponQueryArgs::new()
        .affiliate_id(affiliate_id)
        .number(1)
        .order("DESC");
    let coupons = state.store.get_coupons(&args).await?.into_coupons();
    Ok(coupons.and_then(|c| c.into_iter().next()))
}

/// Generate a fresh code for an affiliate, passed through the code filters.
pub fn generate_code(state: &AppState, affiliate_id: DbId) -> String {
    state
        .hooks
        .filter_generated_code(generate_coupon_code(), affiliate_id)
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Resolve a coupon from an id or a code.
pub async fn get_coupon(state: &AppState, reference: &CouponReference) -> AppResult<Option<Coupon>> {
    let coupon = match reference {
        CouponReference::Id(id) => state.store.get_object(*id).await?,
        CouponReference::Code(code) => {
            state
                .store
                .get_by(CouponColumn::CouponCode, code)
                .await?
        }
    };
    Ok(coupon)
}

/// Exact-match lookup on any coupon column.
pub async fn get_coupon_by(
    state: &AppState,
    column: CouponColumn,
    value: &str,
) -> AppResult<Option<Coupon>> {
    Ok(state.store.get_by(column, value).await?)
}

/// One coupon owned by the affiliate, matched by code or id.
pub async fn get_affiliate_coupon(
    state: &AppState,
    affiliate_id: DbId,
    reference: &CouponReference,
) -> AppResult<Coupon> {
    let affiliate_id = resolve_affiliate(state, affiliate_id)
        .await?
        .ok_or(AppError::InvalidCouponAffiliate(affiliate_id))?;

    let args = CouponQueryArgs::new().affiliate_id(affiliate_id).number(1);
    let args = match reference {
        CouponReference::Code(code) => args.coupon_code(code.clone()),
        CouponReference::Id(id) => args.coupon_id(*id),
    };

    state
        .store
        .get_coupons(&args)
        .await?
        .into_coupons()
        .and_then(|c| c.into_iter().next())
        .ok_or(AppError::NoCoupons(affiliate_id))
}

/// The affiliate's coupon code for `coupon_id`, or an empty string.
pub async fn get_affiliate_coupon_code(
    state: &AppState,
    affiliate_id: DbId,
    coupon_id: DbId,
) -> AppResult<String> {
    match get_affiliate_coupon(state, affiliate_id, &CouponReference::Id(coupon_id)).await {
        Ok(coupon) => Ok(coupon.coupon_code),
        Err(AppError::InvalidCouponAffiliate(_) | AppError::NoCoupons(_)) => Ok(String::new()),
        Err(e) => Err(e),
    }
}

/// `Some(id)` when the affiliate exists.
pub async fn resolve_affiliate(state: &AppState, affiliate_id: DbId) -> AppResult<Option<DbId>> {
    if affiliate_id <= 0 {
        return Ok(None);
    }
    let exists = AffiliateRepo::exists(&state.pool, affiliate_id).await?;
    Ok(exists.then_some(affiliate_id))
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Coupons of one type across enabled integrations.
pub async fn coupons_of_type(
    state: &AppState,
    coupon_type: CouponType,
    affiliate_id: DbId,
    details_only: bool,
) -> AppResult<CouponMap> {
    let resolved = resolve_affiliate(state, affiliate_id).await?;
    Ok(aggregation::collect_coupons(
        &state.registry,
        &state.hooks,
        coupon_type,
        resolved,
        details_only,
    )
    .await)
}

/// Manual and dynamic coupons for the affiliate, after the combined filter.
pub async fn affiliate_coupons(
    state: &AppState,
    affiliate_id: DbId,
    details_only: bool,
) -> AppResult<AffiliateCoupons> {
    let resolved = resolve_affiliate(state, affiliate_id).await?;
    Ok(
        aggregation::affiliate_coupons(&state.registry, &state.hooks, resolved, details_only)
            .await,
    )
}

/// Whether dynamic coupons can be served: an enabled dynamic integration and
/// a configured coupon template.
pub async fn dynamic_coupons_is_setup(state: &AppState) -> AppResult<bool> {
    let template = SettingsRepo::get_value(&state.pool, COUPON_TEMPLATE_SETTING).await?;
    Ok(aggregation::dynamic_coupons_is_setup(
        &state.registry,
        template_is_configured(template.as_ref()),
    ))
}

/// Dashboard coupon table for the affiliate.
pub async fn coupon_table(state: &AppState, affiliate_id: DbId) -> AppResult<CouponTableView> {
    let coupons = affiliate_coupons(state, affiliate_id, true).await?;
    Ok(build_coupon_table(
        affiliate_id,
        &coupons,
        state.hooks.table_extensions(),
    ))
}
