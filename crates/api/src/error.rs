use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use coupons_core::error::CoreError;
use coupons_core::types::DbId;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Renders as `{ "error": ..., "code": ... }` JSON.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A coupon reference (id or code) matched nothing.
    #[error("Coupon not found: {0}")]
    CouponNotFound(String),

    /// The affiliate of an affiliate-scoped coupon lookup did not resolve.
    #[error("Invalid affiliate: {0}")]
    InvalidCouponAffiliate(DbId),

    /// An affiliate-scoped coupon lookup matched nothing.
    #[error("No coupons were found for affiliate {0}")]
    NoCoupons(DbId),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::UnknownIntegration(id) => (
                    StatusCode::NOT_FOUND,
                    "UNKNOWN_INTEGRATION",
                    format!("Unknown integration '{id}'"),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::CouponNotFound(reference) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("Coupon '{reference}' not found"),
            ),
            AppError::InvalidCouponAffiliate(_) => (
                StatusCode::BAD_REQUEST,
                "INVALID_COUPON_AFFILIATE",
                "Invalid affiliate".to_string(),
            ),
            AppError::NoCoupons(_) => (
                StatusCode::NOT_FOUND,
                "NO_COUPONS",
                "No coupons were found.".to_string(),
            ),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// `RowNotFound` maps to 404; everything else to a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
