//! Affiliate dashboard coupon table.
//!
//! Builds a render-ready view of an affiliate's coupons: one row per coupon
//! (manual before dynamic), `Coupon Code` and `Amount` columns, and any
//! columns or surrounding content contributed by table extensions.

use serde::Serialize;

use crate::aggregation::AffiliateCoupons;
use crate::coupons::{CouponType, IntegrationCoupon};
use crate::types::DbId;

/// Heading shown above the table.
pub const TABLE_TITLE: &str = "Coupons";

/// Message shown when the affiliate has no coupons.
pub const EMPTY_MESSAGE: &str = "There are currently no coupon codes to display.";

const CODE_HEADER: &str = "Coupon Code";
const AMOUNT_HEADER: &str = "Amount";

/// Contributes content to the dashboard coupon table.
///
/// Every method has an empty default so extensions only implement the parts
/// they care about.
pub trait CouponTableExtension: Send + Sync {
    /// Content rendered at the top of the tab, before the table.
    fn before_table(&self, _affiliate_id: DbId) -> Option<String> {
        None
    }

    /// Extra header cells appended after `Amount`.
    fn extra_headers(&self) -> Vec<String> {
        Vec::new()
    }

    /// Extra cells for one coupon row. Should match `extra_headers` in length.
    fn extra_cells(&self, _coupon: &IntegrationCoupon) -> Vec<String> {
        Vec::new()
    }

    /// Content rendered after the table.
    fn after_table(&self, _affiliate_id: DbId) -> Option<String> {
        None
    }
}

/// A single table cell, labelled with its column header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCell {
    pub header: String,
    pub value: String,
}

/// One rendered coupon row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub coupon_type: CouponType,
    pub coupon_id: DbId,
    pub cells: Vec<TableCell>,
}

/// Render-ready coupon table for one affiliate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CouponTableView {
    pub affiliate_id: DbId,
    pub title: String,
    pub before: Vec<String>,
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
    /// Present only when there are no rows.
    pub empty_message: Option<String>,
    pub after: Vec<String>,
}

/// Build the table view from aggregated coupons.
pub fn build_coupon_table(
    affiliate_id: DbId,
    coupons: &AffiliateCoupons,
    extensions: &[std::sync::Arc<dyn CouponTableExtension>],
) -> CouponTableView {
    let before = extensions
        .iter()
        .filter_map(|e| e.before_table(affiliate_id))
        .collect();
    let after = extensions
        .iter()
        .filter_map(|e| e.after_table(affiliate_id))
        .collect();

    let mut headers = vec![CODE_HEADER.to_string(), AMOUNT_HEADER.to_string()];
    headers.extend(extensions.iter().flat_map(|e| e.extra_headers()));

    let rows: Vec<TableRow> = coupons
        .iter()
        .map(|(coupon_type, coupon_id, coupon)| {
            let mut values = vec![
                coupon.code().unwrap_or_default().to_string(),
                coupon.amount().unwrap_or_default(),
            ];
            values.extend(extensions.iter().flat_map(|e| e.extra_cells(coupon)));

            TableRow {
                coupon_type,
                coupon_id,
                cells: headers
                    .iter()
                    .cloned()
                    .zip(values.into_iter().chain(std::iter::repeat(String::new())))
                    .map(|(header, value)| TableCell { header, value })
                    .collect(),
            }
        })
        .collect();

    let empty_message = rows.is_empty().then(|| EMPTY_MESSAGE.to_string());

    CouponTableView {
        affiliate_id,
        title: TABLE_TITLE.to_string(),
        before,
        headers,
        rows,
        empty_message,
        after,
    }
}
