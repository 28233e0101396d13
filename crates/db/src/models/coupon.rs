//! Coupon entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use coupons_core::coupon_code::MAX_CODE_LENGTH;
use coupons_core::coupons::CouponReference;
use coupons_core::types::DbId;

/// `validator`'s `length` bounds are `u64`.
const MAX_CODE_LENGTH_U64: u64 = MAX_CODE_LENGTH as u64;

/// A row from the `coupons` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Coupon {
    pub coupon_id: DbId,
    pub affiliate_id: DbId,
    pub coupon_code: String,
}

/// An existing coupon resolves by its id.
impl From<&Coupon> for CouponReference {
    fn from(coupon: &Coupon) -> Self {
        CouponReference::Id(coupon.coupon_id)
    }
}

/// A partial coupon row, produced when a query selects a column subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CouponFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

/// Result of a coupon list query, shaped by its field selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CouponQueryResult {
    Coupons(Vec<Coupon>),
    Ids(Vec<DbId>),
    Fields(Vec<CouponFields>),
}

impl CouponQueryResult {
    pub fn len(&self) -> usize {
        match self {
            Self::Coupons(rows) => rows.len(),
            Self::Ids(ids) => ids.len(),
            Self::Fields(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Full records, if the query selected every column.
    pub fn into_coupons(self) -> Option<Vec<Coupon>> {
        match self {
            Self::Coupons(rows) => Some(rows),
            _ => None,
        }
    }
}

/// DTO for creating a coupon. A missing code is generated.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCoupon {
    #[validate(range(min = 1))]
    pub affiliate_id: DbId,
    #[validate(length(max = MAX_CODE_LENGTH_U64))]
    pub coupon_code: Option<String>,
}

/// DTO for updating an affiliate's coupon. A missing code keeps the current one.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCoupon {
    #[validate(length(max = MAX_CODE_LENGTH_U64))]
    pub coupon_code: Option<String>,
}
