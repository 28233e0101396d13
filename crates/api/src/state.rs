use std::sync::Arc;
use std::time::Duration;

use coupons_core::hooks::CouponHooks;
use coupons_core::integrations::IntegrationRegistry;
use coupons_db::{CouponStore, QueryCache};

use crate::config::ServerConfig;
use crate::integrations;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: coupons_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Cached coupon store.
    pub store: CouponStore,
    /// Event bus for coupon events.
    pub event_bus: Arc<coupons_events::EventBus>,
    /// Registered coupon integrations.
    pub registry: Arc<IntegrationRegistry>,
    /// Coupon filters and dashboard table extensions.
    pub hooks: Arc<CouponHooks>,
}

impl AppState {
    /// Build state with the built-in integrations and no hooks.
    pub fn new(
        pool: coupons_db::DbPool,
        config: ServerConfig,
        event_bus: Arc<coupons_events::EventBus>,
    ) -> Self {
        Self::with_hooks(pool, config, event_bus, CouponHooks::default())
    }

    pub fn with_hooks(
        pool: coupons_db::DbPool,
        config: ServerConfig,
        event_bus: Arc<coupons_events::EventBus>,
        hooks: CouponHooks,
    ) -> Self {
        let cache = QueryCache::new(
            config.coupons.cache_capacity,
            Duration::from_secs(config.coupons.cache_ttl_secs),
        );
        let store = CouponStore::new(pool.clone(), cache);
        let registry = integrations::build_registry(&store, &config.coupons);

        Self {
            pool,
            config: Arc::new(config),
            store,
            event_bus,
            registry: Arc::new(registry),
            hooks: Arc::new(hooks),
        }
    }
}
