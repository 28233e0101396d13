//! Repository for the `coupons` table.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use coupons_core::coupon_code::normalize_for_lookup;
use coupons_core::coupon_query::{CouponColumn, CouponQuery, FieldSelection};
use coupons_core::types::DbId;

use crate::models::coupon::{Coupon, CouponFields, CouponQueryResult};

/// Column list for `coupons` SELECT queries.
const COLUMNS: &str = "coupon_id, affiliate_id, coupon_code";

/// Provides query and write operations for coupons.
pub struct CouponRepo;

impl CouponRepo {
    /// Find a coupon by its primary key.
    pub async fn find_by_id(pool: &PgPool, coupon_id: DbId) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coupons WHERE coupon_id = $1");
        sqlx::query_as::<_, Coupon>(&query)
            .bind(coupon_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the first coupon whose `column` equals `value`.
    ///
    /// Codes are matched uppercase. A non-numeric value for an id column
    /// matches nothing.
    pub async fn find_by(
        pool: &PgPool,
        column: CouponColumn,
        value: &str,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM coupons WHERE {column} = $1 ORDER BY coupon_id ASC LIMIT 1"
        );
        let q = sqlx::query_as::<_, Coupon>(&query);
        match column {
            CouponColumn::CouponCode => q.bind(normalize_for_lookup(value)).fetch_optional(pool).await,
            CouponColumn::CouponId | CouponColumn::AffiliateId => match value.trim().parse::<DbId>() {
                Ok(id) => q.bind(id).fetch_optional(pool).await,
                Err(_) => Ok(None),
            },
        }
    }

    /// Run a normalized list query, shaped by its field selection.
    pub async fn list(pool: &PgPool, params: &CouponQuery) -> Result<CouponQueryResult, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_coupon_filter(params);

        let query = format!(
            "SELECT {} FROM coupons {where_clause} \
             ORDER BY {} {} \
             LIMIT ${bind_idx} OFFSET ${}",
            params.fields.select_list(),
            params.orderby,
            params.order.as_sql(),
            bind_idx + 1
        );

        match &params.fields {
            FieldSelection::All => {
                let q = bind_coupon_values(sqlx::query_as::<_, Coupon>(&query), &bind_values);
                let rows = q
                    .bind(params.number)
                    .bind(params.offset)
                    .fetch_all(pool)
                    .await?;
                Ok(CouponQueryResult::Coupons(rows))
            }
            FieldSelection::Ids => {
                let q = bind_coupon_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
                let ids = q
                    .bind(params.number)
                    .bind(params.offset)
                    .fetch_all(pool)
                    .await?;
                Ok(CouponQueryResult::Ids(ids))
            }
            FieldSelection::Columns(columns) => {
                let q = bind_coupon_values_raw(sqlx::query(&query), &bind_values);
                let rows = q
                    .bind(params.number)
                    .bind(params.offset)
                    .fetch_all(pool)
                    .await?;
                let fields = rows
                    .iter()
                    .map(|row| row_to_fields(row, columns))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CouponQueryResult::Fields(fields))
            }
        }
    }

    /// Count coupons matching the query's filters. Pagination is ignored.
    pub async fn count(pool: &PgPool, params: &CouponQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_coupon_filter(params);

        let query = format!("SELECT COUNT(*)::BIGINT AS count FROM coupons {where_clause}");

        let q = bind_coupon_values_scalar(sqlx::query_scalar::<_, i64>(&query), &bind_values);
        q.fetch_one(pool).await
    }

    /// Insert a coupon. The code must already be sanitized.
    pub async fn insert(
        pool: &PgPool,
        affiliate_id: DbId,
        coupon_code: &str,
    ) -> Result<Coupon, sqlx::Error> {
        let query = format!(
            "INSERT INTO coupons (affiliate_id, coupon_code) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(affiliate_id)
            .bind(coupon_code)
            .fetch_one(pool)
            .await
    }

    /// Replace a coupon's code. Returns `None` if the coupon does not exist.
    pub async fn update_code(
        pool: &PgPool,
        coupon_id: DbId,
        coupon_code: &str,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!(
            "UPDATE coupons SET coupon_code = $2 WHERE coupon_id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(coupon_id)
            .bind(coupon_code)
            .fetch_optional(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Dynamic filter helpers
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built coupon queries.
enum BindValue {
    BigIntList(Vec<i64>),
    TextList(Vec<String>),
}

/// Build a WHERE clause and bind values from a normalized query.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. Rows with a zero
/// primary key are always excluded.
fn build_coupon_filter(params: &CouponQuery) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = vec!["coupon_id <> 0".to_string()];
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if !params.coupon_ids.is_empty() {
        conditions.push(format!("coupon_id = ANY(${bind_idx})"));
        bind_idx += 1;
        bind_values.push(BindValue::BigIntList(params.coupon_ids.clone()));
    }

    if !params.affiliate_ids.is_empty() {
        conditions.push(format!("affiliate_id = ANY(${bind_idx})"));
        bind_idx += 1;
        bind_values.push(BindValue::BigIntList(params.affiliate_ids.clone()));
    }

    if !params.coupon_codes.is_empty() {
        conditions.push(format!("coupon_code = ANY(${bind_idx})"));
        bind_idx += 1;
        bind_values.push(BindValue::TextList(params.coupon_codes.clone()));
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));
    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_coupon_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigIntList(v) => q = q.bind(v.as_slice()),
            BindValue::TextList(v) => q = q.bind(v.as_slice()),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_coupon_values_scalar<'q, O>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigIntList(v) => q = q.bind(v.as_slice()),
            BindValue::TextList(v) => q = q.bind(v.as_slice()),
        }
    }
    q
}

/// Bind a slice of `BindValue` to an untyped sqlx `Query`.
fn bind_coupon_values_raw<'q>(
    mut q: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::BigIntList(v) => q = q.bind(v.as_slice()),
            BindValue::TextList(v) => q = q.bind(v.as_slice()),
        }
    }
    q
}

/// Read the selected columns of a row into a partial record.
fn row_to_fields(row: &PgRow, columns: &[CouponColumn]) -> Result<CouponFields, sqlx::Error> {
    let mut fields = CouponFields::default();
    for column in columns {
        match column {
            CouponColumn::CouponId => fields.coupon_id = Some(row.try_get(column.as_str())?),
            CouponColumn::AffiliateId => fields.affiliate_id = Some(row.try_get(column.as_str())?),
            CouponColumn::CouponCode => fields.coupon_code = Some(row.try_get(column.as_str())?),
        }
    }
    Ok(fields)
}
