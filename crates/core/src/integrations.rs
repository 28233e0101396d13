//! Coupon integration trait and registry.
//!
//! An integration adapts a third-party coupon system. The registry holds
//! every known integration with its enabled flag and answers capability
//! queries for the aggregation layer.

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::coupons::{CouponType, IntegrationCoupon};
use crate::error::CoreError;
use crate::types::DbId;

/// Coupons returned by an integration, keyed by the provider's coupon id.
pub type CouponMap = IndexMap<DbId, IntegrationCoupon>;

// ---------------------------------------------------------------------------
// Capability / status
// ---------------------------------------------------------------------------

/// A feature an integration may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManualCoupons,
    DynamicCoupons,
}

impl Capability {
    /// The capability needed to serve coupons of `coupon_type`.
    pub fn for_coupon_type(coupon_type: CouponType) -> Self {
        match coupon_type {
            CouponType::Manual => Self::ManualCoupons,
            CouponType::Dynamic => Self::DynamicCoupons,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ManualCoupons => "manual_coupons",
            Self::DynamicCoupons => "dynamic_coupons",
        }
    }
}

/// Whether an integration has been switched on by the site operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationStatus {
    Enabled,
    Disabled,
}

// ---------------------------------------------------------------------------
// Integration trait
// ---------------------------------------------------------------------------

/// A pluggable coupon provider.
#[async_trait]
pub trait CouponIntegration: Send + Sync {
    /// Stable identifier, e.g. `"woocommerce"`.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    fn supports(&self, capability: Capability) -> bool;

    /// Whether the provider's backing system is available right now.
    fn is_active(&self) -> bool;

    /// Coupons of `coupon_type` for the affiliate.
    ///
    /// With `details_only` the values are [`IntegrationCoupon::Details`];
    /// otherwise the provider's own coupon objects.
    async fn coupons_of_type(
        &self,
        coupon_type: CouponType,
        affiliate_id: DbId,
        details_only: bool,
    ) -> Result<CouponMap, CoreError>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Filter for [`IntegrationRegistry::query`]. `None` fields match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct IntegrationFilter {
    pub supports: Option<Capability>,
    pub status: Option<IntegrationStatus>,
}

impl IntegrationFilter {
    /// Enabled integrations advertising `capability`.
    pub fn enabled_with(capability: Capability) -> Self {
        Self {
            supports: Some(capability),
            status: Some(IntegrationStatus::Enabled),
        }
    }
}

/// Id and name of a registered integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrationSummary {
    pub id: String,
    pub name: String,
    pub enabled: bool,
}

struct RegistryEntry {
    integration: Arc<dyn CouponIntegration>,
    enabled: bool,
}

/// Holds all known integrations in registration order.
#[derive(Default)]
pub struct IntegrationRegistry {
    entries: Vec<RegistryEntry>,
}

impl IntegrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an integration. Re-registering an id replaces the old entry
    /// in place.
    pub fn register(&mut self, integration: Arc<dyn CouponIntegration>, enabled: bool) {
        let entry = RegistryEntry {
            integration,
            enabled,
        };
        match self
            .entries
            .iter_mut()
            .find(|e| e.integration.id() == entry.integration.id())
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Enable or disable a registered integration.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<(), CoreError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.integration.id() == id)
            .ok_or_else(|| CoreError::UnknownIntegration(id.to_string()))?;
        entry.enabled = enabled;
        Ok(())
    }

    /// Integrations matching `filter`, in registration order.
    pub fn query(&self, filter: &IntegrationFilter) -> Vec<IntegrationSummary> {
        self.entries
            .iter()
            .filter(|e| {
                filter
                    .supports
                    .map_or(true, |cap| e.integration.supports(cap))
            })
            .filter(|e| match filter.status {
                None => true,
                Some(IntegrationStatus::Enabled) => e.enabled,
                Some(IntegrationStatus::Disabled) => !e.enabled,
            })
            .map(|e| IntegrationSummary {
                id: e.integration.id().to_string(),
                name: e.integration.name().to_string(),
                enabled: e.enabled,
            })
            .collect()
    }

    /// Look up an integration by id.
    pub fn get(&self, id: &str) -> Result<Arc<dyn CouponIntegration>, CoreError> {
        self.entries
            .iter()
            .find(|e| e.integration.id() == id)
            .map(|e| Arc::clone(&e.integration))
            .ok_or_else(|| CoreError::UnknownIntegration(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
