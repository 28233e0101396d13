//! Aggregation of an affiliate's coupons across integrations.
//!
//! For each coupon type, every enabled integration advertising the matching
//! capability is asked for the affiliate's coupons, provided it reports
//! itself active. Results are merged by coupon key with the first writer
//! winning. Dynamic coupons may be shared between affiliates, so the merged
//! dynamic list is also deduplicated by value.

use serde::Serialize;

use crate::coupons::{CouponType, IntegrationCoupon};
use crate::hooks::CouponHooks;
use crate::integrations::{
    Capability, CouponMap, IntegrationFilter, IntegrationRegistry, IntegrationSummary,
};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// AffiliateCoupons
// ---------------------------------------------------------------------------

/// An affiliate's coupons grouped by type. Empty groups are omitted when
/// serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AffiliateCoupons {
    #[serde(skip_serializing_if = "CouponMap::is_empty")]
    pub manual: CouponMap,
    #[serde(skip_serializing_if = "CouponMap::is_empty")]
    pub dynamic: CouponMap,
}

impl AffiliateCoupons {
    pub fn is_empty(&self) -> bool {
        self.manual.is_empty() && self.dynamic.is_empty()
    }

    /// Total number of coupons across both groups.
    pub fn len(&self) -> usize {
        self.manual.len() + self.dynamic.len()
    }

    pub fn of_type(&self, coupon_type: CouponType) -> &CouponMap {
        match coupon_type {
            CouponType::Manual => &self.manual,
            CouponType::Dynamic => &self.dynamic,
        }
    }

    /// Iterate every coupon, manual first, with its type and key.
    pub fn iter(&self) -> impl Iterator<Item = (CouponType, DbId, &IntegrationCoupon)> {
        CouponType::ALL.into_iter().flat_map(move |t| {
            self.of_type(t)
                .iter()
                .map(move |(id, coupon)| (t, *id, coupon))
        })
    }
}

// ---------------------------------------------------------------------------
// Merge helpers
// ---------------------------------------------------------------------------

/// Merge `incoming` into `target`. Keys already present in `target` keep
/// their existing value.
pub fn merge_first_wins(target: &mut CouponMap, incoming: CouponMap) {
    for (id, coupon) in incoming {
        target.entry(id).or_insert(coupon);
    }
}

/// Drop entries whose value equals an earlier entry's value.
pub fn dedup_by_value(coupons: CouponMap) -> CouponMap {
    let mut unique = CouponMap::with_capacity(coupons.len());
    for (id, coupon) in coupons {
        if !unique.values().any(|existing| *existing == coupon) {
            unique.insert(id, coupon);
        }
    }
    unique
}

// ---------------------------------------------------------------------------
// Integration options
// ---------------------------------------------------------------------------

/// Enabled integrations that can provide coupons of `coupon_type`.
pub fn integration_options(
    registry: &IntegrationRegistry,
    coupon_type: CouponType,
) -> Vec<IntegrationSummary> {
    registry.query(&IntegrationFilter::enabled_with(
        Capability::for_coupon_type(coupon_type),
    ))
}

/// Dynamic coupons are set up when a dynamic-capable integration is enabled
/// and a coupon template is configured.
pub fn dynamic_coupons_is_setup(registry: &IntegrationRegistry, template_configured: bool) -> bool {
    !integration_options(registry, CouponType::Dynamic).is_empty() && template_configured
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Coupons of one type for an affiliate.
///
/// `affiliate_id` is `None` when the affiliate reference did not resolve;
/// the result is then empty and no filters run. Integrations that fail are
/// logged and skipped.
pub async fn collect_coupons(
    registry: &IntegrationRegistry,
    hooks: &CouponHooks,
    coupon_type: CouponType,
    affiliate_id: Option<DbId>,
    details_only: bool,
) -> CouponMap {
    let Some(affiliate_id) = affiliate_id else {
        return CouponMap::new();
    };

    let mut coupons = CouponMap::new();

    for summary in integration_options(registry, coupon_type) {
        let integration = match registry.get(&summary.id) {
            Ok(integration) => integration,
            Err(e) => {
                tracing::warn!(error = %e, integration = %summary.id, "Integration lookup failed");
                continue;
            }
        };

        if !integration.is_active() {
            continue;
        }

        match integration
            .coupons_of_type(coupon_type, affiliate_id, details_only)
            .await
        {
            Ok(found) => merge_first_wins(&mut coupons, found),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    integration = %summary.id,
                    coupon_type = %coupon_type,
                    affiliate_id,
                    "Integration failed to return coupons",
                );
            }
        }
    }

    if coupon_type == CouponType::Dynamic && !coupons.is_empty() {
        coupons = dedup_by_value(coupons);
    }

    hooks.filter_list(coupon_type, coupons, affiliate_id, details_only)
}

/// All coupons for an affiliate, grouped by type.
pub async fn affiliate_coupons(
    registry: &IntegrationRegistry,
    hooks: &CouponHooks,
    affiliate_id: Option<DbId>,
    details_only: bool,
) -> AffiliateCoupons {
    let Some(id) = affiliate_id else {
        return AffiliateCoupons::default();
    };

    let coupons = AffiliateCoupons {
        manual: collect_coupons(registry, hooks, CouponType::Manual, Some(id), details_only).await,
        dynamic: collect_coupons(registry, hooks, CouponType::Dynamic, Some(id), details_only)
            .await,
    };

    hooks.filter_combined(coupons, id, details_only)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::coupons::CouponDetails;
    use crate::integrations::tests::FakeIntegration;

    fn details(code: &str) -> IntegrationCoupon {
        IntegrationCoupon::Details(CouponDetails {
            code: code.to_string(),
            amount: "10%".to_string(),
        })
    }

    #[test]
    fn merge_keeps_first_value_for_shared_key() {
        let mut target = CouponMap::new();
        target.insert(1, details("FIRST"));
        let mut incoming = CouponMap::new();
        incoming.insert(1, details("SECOND"));
        incoming.insert(2, details("OTHER"));

        merge_first_wins(&mut target, incoming);

        assert_eq!(target.len(), 2);
        assert_eq!(target[&1_i64], details("FIRST"));
    }

    #[test]
    fn dedup_removes_equal_values_under_different_keys() {
        let mut coupons = CouponMap::new();
        coupons.insert(1, details("GLOBAL"));
        coupons.insert(2, details("GLOBAL"));
        coupons.insert(3, details("OWN"));

        let unique = dedup_by_value(coupons);

        assert_eq!(unique.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[tokio::test]
    async fn unresolved_affiliate_yields_empty_result() {
        let registry = IntegrationRegistry::new();
        let result = affiliate_coupons(&registry, &CouponHooks::new(), None, true).await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn no_active_integrations_yields_empty_result() {
        let mut registry = IntegrationRegistry::new();
        registry.register(
            Arc::new(
                FakeIntegration::new("off", vec![Capability::ManualCoupons])
                    .with_coupon(CouponType::Manual, 1, 10, "A")
                    .inactive(),
            ),
            true,
        );
        registry.register(
            Arc::new(
                FakeIntegration::new("disabled", vec![Capability::DynamicCoupons])
                    .with_coupon(CouponType::Dynamic, 1, 11, "B"),
            ),
            false,
        );

        let result = affiliate_coupons(&registry, &CouponHooks::new(), Some(1), true).await;

        assert!(result.is_empty());
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({}));
    }

    #[tokio::test]
    async fn manual_coupons_merge_first_writer_wins() {
        let mut registry = IntegrationRegistry::new();
        registry.register(
            Arc::new(
                FakeIntegration::new("one", vec![Capability::ManualCoupons])
                    .with_coupon(CouponType::Manual, 1, 10, "FROM_ONE"),
            ),
            true,
        );
        registry.register(
            Arc::new(
                FakeIntegration::new("two", vec![Capability::ManualCoupons])
                    .with_coupon(CouponType::Manual, 1, 10, "FROM_TWO")
                    .with_coupon(CouponType::Manual, 1, 12, "ONLY_TWO"),
            ),
            true,
        );

        let coupons =
            collect_coupons(&registry, &CouponHooks::new(), CouponType::Manual, Some(1), true)
                .await;

        assert_eq!(coupons.len(), 2);
        assert_eq!(coupons[&10_i64].code(), Some("FROM_ONE"));
        assert_eq!(coupons[&12_i64].code(), Some("ONLY_TWO"));
    }

    #[tokio::test]
    async fn duplicate_dynamic_values_are_removed() {
        let mut registry = IntegrationRegistry::new();
        registry.register(
            Arc::new(
                FakeIntegration::new("one", vec![Capability::DynamicCoupons])
                    .with_coupon(CouponType::Dynamic, 1, 20, "GLOBAL"),
            ),
            true,
        );
        registry.register(
            Arc::new(
                FakeIntegration::new("two", vec![Capability::DynamicCoupons])
                    .with_coupon(CouponType::Dynamic, 1, 21, "GLOBAL")
                    .with_coupon(CouponType::Dynamic, 1, 22, "MINE"),
            ),
            true,
        );

        let coupons =
            collect_coupons(&registry, &CouponHooks::new(), CouponType::Dynamic, Some(1), true)
                .await;

        assert_eq!(coupons.keys().copied().collect::<Vec<_>>(), vec![20, 22]);
    }

    #[tokio::test]
    async fn global_coupon_from_two_providers_is_listed_once() {
        let mut registry = IntegrationRegistry::new();
        registry.register(
            Arc::new(
                FakeIntegration::new("woocommerce", vec![Capability::DynamicCoupons])
                    .with_coupon(CouponType::Dynamic, 1, 1, "GLOBAL10"),
            ),
            true,
        );
        registry.register(
            Arc::new(
                FakeIntegration::new("edd", vec![Capability::DynamicCoupons])
                    .with_coupon(CouponType::Dynamic, 1, 2, "GLOBAL10"),
            ),
            true,
        );

        let coupons =
            collect_coupons(&registry, &CouponHooks::new(), CouponType::Dynamic, Some(1), true)
                .await;

        assert_eq!(coupons.len(), 1);
        assert_eq!(coupons[&1_i64].code(), Some("GLOBAL10"));
    }

    #[tokio::test]
    async fn manual_duplicates_are_not_deduplicated_by_value() {
        let mut registry = IntegrationRegistry::new();
        registry.register(
            Arc::new(
                FakeIntegration::new("one", vec![Capability::ManualCoupons])
                    .with_coupon(CouponType::Manual, 1, 30, "SAME")
                    .with_coupon(CouponType::Manual, 1, 31, "SAME"),
            ),
            true,
        );

        let coupons =
            collect_coupons(&registry, &CouponHooks::new(), CouponType::Manual, Some(1), true)
                .await;

        assert_eq!(coupons.len(), 2);
    }

    #[tokio::test]
    async fn combined_result_groups_by_type_and_runs_filters() {
        let mut registry = IntegrationRegistry::new();
        registry.register(
            Arc::new(
                FakeIntegration::new(
                    "both",
                    vec![Capability::ManualCoupons, Capability::DynamicCoupons],
                )
                .with_coupon(CouponType::Manual, 5, 1, "M1")
                .with_coupon(CouponType::Dynamic, 5, 2, "D1")
                .with_coupon(CouponType::Dynamic, 6, 3, "OTHER_AFFILIATE"),
            ),
            true,
        );

        let mut hooks = CouponHooks::new();
        hooks.add_combined_filter(Arc::new(
            |mut coupons: AffiliateCoupons, _: DbId, _: bool| {
                coupons.manual.clear();
                coupons
            },
        ));

        let unfiltered = affiliate_coupons(&registry, &CouponHooks::new(), Some(5), true).await;
        assert_eq!(unfiltered.len(), 2);
        let types: Vec<_> = unfiltered.iter().map(|(t, _, _)| t).collect();
        assert_eq!(types, vec![CouponType::Manual, CouponType::Dynamic]);

        let filtered = affiliate_coupons(&registry, &hooks, Some(5), true).await;
        assert!(filtered.manual.is_empty());
        assert_eq!(filtered.dynamic.len(), 1);
    }

    #[tokio::test]
    async fn full_objects_returned_when_not_details_only() {
        let mut registry = IntegrationRegistry::new();
        registry.register(
            Arc::new(
                FakeIntegration::new("one", vec![Capability::ManualCoupons])
                    .with_coupon(CouponType::Manual, 1, 40, "OBJ"),
            ),
            true,
        );

        let coupons =
            collect_coupons(&registry, &CouponHooks::new(), CouponType::Manual, Some(1), false)
                .await;

        assert_eq!(
            coupons[&40_i64],
            IntegrationCoupon::Object(json!({"id": 40, "code": "OBJ"}))
        );
    }

    #[test]
    fn dynamic_setup_requires_integration_and_template() {
        let mut registry = IntegrationRegistry::new();
        assert!(!dynamic_coupons_is_setup(&registry, true));

        registry.register(
            Arc::new(FakeIntegration::new("dyn", vec![Capability::DynamicCoupons])),
            true,
        );
        assert!(!dynamic_coupons_is_setup(&registry, false));
        assert!(dynamic_coupons_is_setup(&registry, true));
    }
}
