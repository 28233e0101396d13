//! Built-in coupon integrations and registry construction.

pub mod store;

use std::sync::Arc;

use coupons_core::integrations::IntegrationRegistry;
use coupons_db::CouponStore;

use crate::config::CouponSettings;

pub use store::StoreCouponIntegration;

/// Register the built-in integrations, enabling those named in settings.
pub fn build_registry(store: &CouponStore, settings: &CouponSettings) -> IntegrationRegistry {
    let mut registry = IntegrationRegistry::new();

    let store_integration = StoreCouponIntegration::new(store.clone());
    let enabled = settings
        .enabled_integrations
        .iter()
        .any(|id| id == store::INTEGRATION_ID);
    registry.register(Arc::new(store_integration), enabled);

    for id in &settings.enabled_integrations {
        if registry.get(id).is_err() {
            tracing::warn!(integration = %id, "Enabled integration is not registered");
        }
    }

    tracing::info!(count = registry.len(), "Coupon integrations registered");
    registry
}
