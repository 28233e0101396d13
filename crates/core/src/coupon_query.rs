//! Coupon query arguments, normalization, and cache keys.
//!
//! [`CouponQueryArgs`] is the loose, caller-facing shape (every field
//! optional, single values or lists). [`CouponQueryArgs::normalize`] turns it
//! into a [`CouponQuery`] with defaults applied, codes sanitized, and invalid
//! ordering options replaced. The repository layer only ever sees the
//! normalized form, and the cache key is derived from it.

use serde::{Deserialize, Serialize};

use crate::coupon_code::sanitize_coupon_code;
use crate::hashing::prefixed_digest;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default page size when `number` is not supplied.
pub const DEFAULT_NUMBER: i64 = 20;

/// Substitute limit used when `number` is zero or negative.
pub const UNBOUNDED_NUMBER: i64 = 999_999_999_999;

/// Cache key prefix for list queries.
const LIST_KEY_PREFIX: &str = "coupons_";

/// Cache key prefix for count queries.
const COUNT_KEY_PREFIX: &str = "coupons_count";

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

/// A column of the `coupons` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponColumn {
    CouponId,
    AffiliateId,
    CouponCode,
}

impl CouponColumn {
    /// Every declared column, in table order.
    pub const ALL: [CouponColumn; 3] = [Self::CouponId, Self::AffiliateId, Self::CouponCode];

    /// The primary key column.
    pub const PRIMARY_KEY: CouponColumn = Self::CouponId;

    /// Column name as it appears in SQL.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CouponId => "coupon_id",
            Self::AffiliateId => "affiliate_id",
            Self::CouponCode => "coupon_code",
        }
    }

    /// Parse a column name. Returns `None` for anything undeclared.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl std::fmt::Display for CouponColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sort order
// ---------------------------------------------------------------------------

/// Result ordering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// `ASC` in any casing selects ascending; every other value is `DESC`.
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("ASC") {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

// ---------------------------------------------------------------------------
// Field selection
// ---------------------------------------------------------------------------

/// Which columns a query returns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "columns")]
pub enum FieldSelection {
    /// Full coupon records.
    #[default]
    All,
    /// Primary keys only.
    Ids,
    /// An explicit column subset, in request order without duplicates.
    Columns(Vec<CouponColumn>),
}

impl FieldSelection {
    /// Parse the raw `fields` argument.
    ///
    /// `"ids"` selects ids, `"*"` or an empty value selects everything, and
    /// column names select a subset. Unknown names are dropped; a subset that
    /// ends up empty falls back to [`FieldSelection::All`].
    pub fn parse(raw: Option<&OneOrMany<String>>) -> Self {
        let names: Vec<&str> = match raw {
            None => return Self::All,
            Some(OneOrMany::One(name)) => match name.trim() {
                "ids" => return Self::Ids,
                "" | "*" => return Self::All,
                other => vec![other],
            },
            Some(OneOrMany::Many(names)) => names.iter().map(|n| n.trim()).collect(),
        };

        let mut columns = Vec::new();
        for column in names.into_iter().filter_map(CouponColumn::from_name) {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }

        if columns.is_empty() {
            Self::All
        } else {
            Self::Columns(columns)
        }
    }

    /// The SQL select list for this selection.
    pub fn select_list(&self) -> String {
        match self {
            Self::All => CouponColumn::ALL
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            Self::Ids => CouponColumn::PRIMARY_KEY.as_str().to_string(),
            Self::Columns(columns) => columns
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw arguments
// ---------------------------------------------------------------------------

/// A single value or a list of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> From<T> for OneOrMany<T> {
    fn from(value: T) -> Self {
        Self::One(value)
    }
}

/// Caller-facing coupon query arguments. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CouponQueryArgs {
    /// Page size. Zero or negative means unbounded. Defaults to 20.
    pub number: Option<i64>,
    /// Rows to skip. Defaults to 0.
    pub offset: Option<i64>,
    /// Coupon id or ids. A single `0` means no filter.
    pub coupon_id: Option<OneOrMany<DbId>>,
    /// Affiliate id or ids. A single `0` means no filter.
    pub affiliate_id: Option<OneOrMany<DbId>>,
    /// Coupon code or codes, sanitized before comparison.
    pub coupon_code: Option<OneOrMany<String>>,
    /// Column to order by. Invalid values fall back to `coupon_id`.
    pub orderby: Option<String>,
    /// `ASC` or `DESC`. Anything else means `DESC`.
    pub order: Option<String>,
    /// `ids`, `*`, a column name, or a list of column names.
    pub fields: Option<OneOrMany<String>>,
}

impl CouponQueryArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(mut self, number: i64) -> Self {
        self.number = Some(number);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn coupon_id(mut self, ids: impl Into<OneOrMany<DbId>>) -> Self {
        self.coupon_id = Some(ids.into());
        self
    }

    pub fn affiliate_id(mut self, ids: impl Into<OneOrMany<DbId>>) -> Self {
        self.affiliate_id = Some(ids.into());
        self
    }

    pub fn coupon_code(mut self, codes: impl Into<OneOrMany<String>>) -> Self {
        self.coupon_code = Some(codes.into());
        self
    }

    pub fn orderby(mut self, column: impl Into<String>) -> Self {
        self.orderby = Some(column.into());
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn fields(mut self, fields: impl Into<OneOrMany<String>>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    /// Apply defaults and normalization rules.
    pub fn normalize(&self) -> CouponQuery {
        let number = match self.number.unwrap_or(DEFAULT_NUMBER) {
            n if n < 1 => UNBOUNDED_NUMBER,
            n => n,
        };

        let orderby = self
            .orderby
            .as_deref()
            .and_then(CouponColumn::from_name)
            .unwrap_or(CouponColumn::PRIMARY_KEY);

        let order = self
            .order
            .as_deref()
            .map(SortOrder::parse_lenient)
            .unwrap_or_default();

        CouponQuery {
            number,
            offset: self.offset.unwrap_or(0).max(0),
            coupon_ids: id_filter(self.coupon_id.as_ref()),
            affiliate_ids: id_filter(self.affiliate_id.as_ref()),
            coupon_codes: code_filter(self.coupon_code.as_ref()),
            orderby,
            order,
            fields: FieldSelection::parse(self.fields.as_ref()),
        }
    }
}

fn id_filter(raw: Option<&OneOrMany<DbId>>) -> Vec<DbId> {
    match raw {
        None | Some(OneOrMany::One(0)) => Vec::new(),
        Some(OneOrMany::One(id)) => vec![*id],
        Some(OneOrMany::Many(ids)) => ids.clone(),
    }
}

fn code_filter(raw: Option<&OneOrMany<String>>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(OneOrMany::One(code)) if code.is_empty() => Vec::new(),
        Some(OneOrMany::One(code)) => vec![sanitize_coupon_code(code)],
        Some(OneOrMany::Many(codes)) => codes.iter().map(|c| sanitize_coupon_code(c)).collect(),
    }
}

// ---------------------------------------------------------------------------
// Normalized query
// ---------------------------------------------------------------------------

/// A fully normalized coupon query, ready for SQL generation and caching.
///
/// Empty filter vectors mean "no filter on this column".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CouponQuery {
    pub number: i64,
    pub offset: i64,
    pub coupon_ids: Vec<DbId>,
    pub affiliate_ids: Vec<DbId>,
    pub coupon_codes: Vec<String>,
    pub orderby: CouponColumn,
    pub order: SortOrder,
    pub fields: FieldSelection,
}

impl Default for CouponQuery {
    fn default() -> Self {
        CouponQueryArgs::default().normalize()
    }
}

impl CouponQuery {
    /// Whether the query selects on every row (no id, affiliate or code filter).
    pub fn is_unfiltered(&self) -> bool {
        self.coupon_ids.is_empty() && self.affiliate_ids.is_empty() && self.coupon_codes.is_empty()
    }

    /// Deterministic digest of this query, distinct for list and count queries.
    ///
    /// Combine with the store's last-changed token to build the cache key.
    pub fn digest(&self, count: bool) -> String {
        let prefix = if count {
            COUNT_KEY_PREFIX
        } else {
            LIST_KEY_PREFIX
        };
        // Serializing a plain struct of owned data cannot fail.
        let serialized = serde_json::to_string(self).unwrap_or_default();
        prefixed_digest(prefix, &serialized)
    }

    /// Full cache key: `"{digest}:{last_changed}"`.
    pub fn cache_key(&self, count: bool, last_changed: &str) -> String {
        format!("{}:{last_changed}", self.digest(count))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_empty_args() {
        let q = CouponQueryArgs::new().normalize();
        assert_eq!(q.number, DEFAULT_NUMBER);
        assert_eq!(q.offset, 0);
        assert!(q.is_unfiltered());
        assert_eq!(q.orderby, CouponColumn::CouponId);
        assert_eq!(q.order, SortOrder::Desc);
        assert_eq!(q.fields, FieldSelection::All);
    }

    #[test]
    fn zero_number_is_unbounded() {
        assert_eq!(CouponQueryArgs::new().number(0).normalize().number, UNBOUNDED_NUMBER);
    }

    #[test]
    fn negative_number_is_unbounded() {
        assert_eq!(CouponQueryArgs::new().number(-5).normalize().number, UNBOUNDED_NUMBER);
    }

    #[test]
    fn negative_offset_clamps_to_zero() {
        assert_eq!(CouponQueryArgs::new().offset(-3).normalize().offset, 0);
    }

    #[test]
    fn single_zero_id_means_no_filter() {
        let q = CouponQueryArgs::new().coupon_id(0_i64).affiliate_id(0_i64).normalize();
        assert!(q.coupon_ids.is_empty());
        assert!(q.affiliate_ids.is_empty());
    }

    #[test]
    fn id_lists_become_membership_filters() {
        let q = CouponQueryArgs::new()
            .coupon_id(OneOrMany::Many(vec![3, 4]))
            .affiliate_id(7_i64)
            .normalize();
        assert_eq!(q.coupon_ids, vec![3, 4]);
        assert_eq!(q.affiliate_ids, vec![7]);
    }

    #[test]
    fn codes_are_sanitized_and_uppercased() {
        let q = CouponQueryArgs::new()
            .coupon_code(OneOrMany::Many(vec!["summer 20".into(), "Vip".into()]))
            .normalize();
        assert_eq!(q.coupon_codes, vec!["SUMMER20".to_string(), "VIP".to_string()]);
    }

    #[test]
    fn empty_single_code_means_no_filter() {
        let q = CouponQueryArgs::new().coupon_code(String::new()).normalize();
        assert!(q.coupon_codes.is_empty());
    }

    #[test]
    fn order_is_case_insensitive() {
        assert_eq!(CouponQueryArgs::new().order("asc").normalize().order, SortOrder::Asc);
        assert_eq!(CouponQueryArgs::new().order("DeSc").normalize().order, SortOrder::Desc);
    }

    #[test]
    fn unknown_order_falls_back_to_desc() {
        assert_eq!(CouponQueryArgs::new().order("sideways").normalize().order, SortOrder::Desc);
    }

    #[test]
    fn unknown_orderby_falls_back_to_primary_key() {
        let q = CouponQueryArgs::new().orderby("amount").normalize();
        assert_eq!(q.orderby, CouponColumn::CouponId);
    }

    #[test]
    fn known_orderby_is_kept() {
        let q = CouponQueryArgs::new().orderby("coupon_code").normalize();
        assert_eq!(q.orderby, CouponColumn::CouponCode);
    }

    #[test]
    fn fields_ids() {
        let q = CouponQueryArgs::new().fields("ids".to_string()).normalize();
        assert_eq!(q.fields, FieldSelection::Ids);
        assert_eq!(q.fields.select_list(), "coupon_id");
    }

    #[test]
    fn fields_star_means_all() {
        let q = CouponQueryArgs::new().fields("*".to_string()).normalize();
        assert_eq!(q.fields, FieldSelection::All);
        assert_eq!(q.fields.select_list(), "coupon_id, affiliate_id, coupon_code");
    }

    #[test]
    fn fields_subset_drops_unknown_and_duplicate_names() {
        let q = CouponQueryArgs::new()
            .fields(OneOrMany::Many(vec![
                "coupon_code".into(),
                "bogus".into(),
                "coupon_code".into(),
                "affiliate_id".into(),
            ]))
            .normalize();
        assert_eq!(
            q.fields,
            FieldSelection::Columns(vec![CouponColumn::CouponCode, CouponColumn::AffiliateId])
        );
    }

    #[test]
    fn fields_with_only_unknown_names_means_all() {
        let q = CouponQueryArgs::new()
            .fields(OneOrMany::Many(vec!["nope".into()]))
            .normalize();
        assert_eq!(q.fields, FieldSelection::All);
    }

    #[test]
    fn args_deserialize_from_single_and_list_values() {
        let args: CouponQueryArgs = serde_json::from_value(serde_json::json!({
            "number": 5,
            "coupon_id": [1, 2],
            "affiliate_id": 9,
            "coupon_code": "abc",
            "fields": ["coupon_code"],
        }))
        .unwrap();
        assert_eq!(args.coupon_id, Some(OneOrMany::Many(vec![1, 2])));
        assert_eq!(args.affiliate_id, Some(OneOrMany::One(9)));
        assert_eq!(args.coupon_code, Some(OneOrMany::One("abc".into())));
    }

    #[test]
    fn equivalent_args_share_a_digest() {
        let a = CouponQueryArgs::new().order("asc").coupon_code("abc".to_string()).normalize();
        let b = CouponQueryArgs::new().order("ASC").coupon_code("ABC".to_string()).normalize();
        assert_eq!(a.digest(false), b.digest(false));
    }

    #[test]
    fn count_and_list_digests_differ() {
        let q = CouponQuery::default();
        assert_ne!(q.digest(true), q.digest(false));
    }

    #[test]
    fn cache_key_embeds_last_changed_token() {
        let q = CouponQuery::default();
        let k1 = q.cache_key(false, "1");
        let k2 = q.cache_key(false, "2");
        assert_ne!(k1, k2);
        assert!(k1.ends_with(":1"));
    }
}
