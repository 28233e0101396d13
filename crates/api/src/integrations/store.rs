//! Integration serving the local coupons table as dynamic coupons.
//!
//! Amounts come from the coupon template setting, since stored coupons carry
//! only a code.

use async_trait::async_trait;

use coupons_core::coupon_query::CouponQueryArgs;
use coupons_core::coupons::{
    template_amount, CouponDetails, CouponType, IntegrationCoupon, COUPON_TEMPLATE_SETTING,
};
use coupons_core::error::CoreError;
use coupons_core::integrations::{Capability, CouponIntegration, CouponMap};
use coupons_core::types::DbId;
use coupons_db::repositories::SettingsRepo;
use coupons_db::CouponStore;

pub const INTEGRATION_ID: &str = "store";

pub struct StoreCouponIntegration {
    store: CouponStore,
}

impl StoreCouponIntegration {
    pub fn new(store: CouponStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CouponIntegration for StoreCouponIntegration {
    fn id(&self) -> &str {
        INTEGRATION_ID
    }

    fn name(&self) -> &str {
        "Coupon Store"
    }

    fn supports(&self, capability: Capability) -> bool {
        capability == Capability::DynamicCoupons
    }

    fn is_active(&self) -> bool {
        true
    }

    async fn coupons_of_type(
        &self,
        coupon_type: CouponType,
        affiliate_id: DbId,
        details_only: bool,
    ) -> Result<CouponMap, CoreError> {
        if coupon_type != CouponType::Dynamic {
            return Ok(CouponMap::new());
        }

        let args = CouponQueryArgs::new()
            .affiliate_id(affiliate_id)
            .number(0)
            .order("ASC");
        let coupons = self
            .store
            .get_coupons(&args)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?
            .into_coupons()
            .unwrap_or_default();

        if !details_only {
            return coupons
                .into_iter()
                .map(|c| {
                    let id = c.coupon_id;
                    serde_json::to_value(c)
                        .map(|v| (id, IntegrationCoupon::Object(v)))
                        .map_err(|e| CoreError::Internal(e.to_string()))
                })
                .collect();
        }

        let template = SettingsRepo::get_value(self.store.pool(), COUPON_TEMPLATE_SETTING)
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        let amount = template_amount(template.as_ref());

        Ok(coupons
            .into_iter()
            .map(|c| {
                let details = CouponDetails {
                    code: c.coupon_code,
                    amount: amount.clone(),
                };
                (c.coupon_id, IntegrationCoupon::Details(details))
            })
            .collect())
    }
}
