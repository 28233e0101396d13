//! Extension points for coupon lists, generated codes, and the dashboard table.
//!
//! Filters run in registration order; each receives the previous filter's
//! output.

use std::sync::Arc;

use crate::aggregation::AffiliateCoupons;
use crate::coupons::CouponType;
use crate::dashboard::CouponTableExtension;
use crate::integrations::CouponMap;
use crate::types::DbId;

/// Filters one category's coupon list: `(type, coupons, affiliate_id, details_only)`.
pub type CouponListFilter =
    Arc<dyn Fn(CouponType, CouponMap, DbId, bool) -> CouponMap + Send + Sync>;

/// Filters the combined manual + dynamic result: `(coupons, affiliate_id, details_only)`.
pub type AffiliateCouponsFilter =
    Arc<dyn Fn(AffiliateCoupons, DbId, bool) -> AffiliateCoupons + Send + Sync>;

/// Filters a freshly generated code: `(code, affiliate_id)`.
pub type GeneratedCodeFilter = Arc<dyn Fn(String, DbId) -> String + Send + Sync>;

/// Registered coupon extension points.
#[derive(Default, Clone)]
pub struct CouponHooks {
    list_filters: Vec<CouponListFilter>,
    combined_filters: Vec<AffiliateCouponsFilter>,
    code_filters: Vec<GeneratedCodeFilter>,
    table_extensions: Vec<Arc<dyn CouponTableExtension>>,
}

impl CouponHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_list_filter(&mut self, filter: CouponListFilter) -> &mut Self {
        self.list_filters.push(filter);
        self
    }

    pub fn add_combined_filter(&mut self, filter: AffiliateCouponsFilter) -> &mut Self {
        self.combined_filters.push(filter);
        self
    }

    pub fn add_code_filter(&mut self, filter: GeneratedCodeFilter) -> &mut Self {
        self.code_filters.push(filter);
        self
    }

    pub fn add_table_extension(&mut self, extension: Arc<dyn CouponTableExtension>) -> &mut Self {
        self.table_extensions.push(extension);
        self
    }

    pub fn filter_list(
        &self,
        coupon_type: CouponType,
        coupons: CouponMap,
        affiliate_id: DbId,
        details_only: bool,
    ) -> CouponMap {
        self.list_filters
            .iter()
            .fold(coupons, |acc, f| f(coupon_type, acc, affiliate_id, details_only))
    }

    pub fn filter_combined(
        &self,
        coupons: AffiliateCoupons,
        affiliate_id: DbId,
        details_only: bool,
    ) -> AffiliateCoupons {
        self.combined_filters
            .iter()
            .fold(coupons, |acc, f| f(acc, affiliate_id, details_only))
    }

    pub fn filter_generated_code(&self, code: String, affiliate_id: DbId) -> String {
        self.code_filters
            .iter()
            .fold(code, |acc, f| f(acc, affiliate_id))
    }

    pub fn table_extensions(&self) -> &[Arc<dyn CouponTableExtension>] {
        &self.table_extensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_filters_run_in_order() {
        let mut hooks = CouponHooks::new();
        hooks
            .add_code_filter(Arc::new(|code: String, _: DbId| format!("{code}A")))
            .add_code_filter(Arc::new(|code: String, id: DbId| format!("{code}{id}")));
        assert_eq!(hooks.filter_generated_code("X".into(), 7), "XA7");
    }

    #[test]
    fn no_filters_pass_values_through() {
        let hooks = CouponHooks::new();
        assert_eq!(hooks.filter_generated_code("CODE".into(), 1), "CODE");
        assert!(hooks
            .filter_list(CouponType::Manual, CouponMap::new(), 1, true)
            .is_empty());
    }
}
