//! Coupon domain types and add/update preconditions.
//!
//! Pure functions only. Database access and event publication happen in the
//! caller (the API service layer).

use serde::{Deserialize, Serialize};

use crate::coupon_code::{generate_coupon_code, sanitize_coupon_code, MAX_CODE_LENGTH};
use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Settings key holding the provider coupon template.
pub const COUPON_TEMPLATE_SETTING: &str = "coupon_template_woocommerce";

/// Event type published after a coupon is stored.
pub const EVENT_COUPON_ADDED: &str = "coupon.added";

/// Event type published after a coupon update is attempted.
pub const EVENT_COUPON_UPDATED: &str = "coupon.updated";

// ---------------------------------------------------------------------------
// CouponType
// ---------------------------------------------------------------------------

/// The two coupon categories an integration can provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponType {
    /// Explicitly created and assigned to one affiliate.
    Manual,
    /// Derived from an integration's own coupon system.
    Dynamic,
}

impl CouponType {
    /// All coupon types, manual first.
    pub const ALL: [CouponType; 2] = [Self::Manual, Self::Dynamic];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Dynamic => "dynamic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Manual => "Manual",
            Self::Dynamic => "Dynamic",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "manual" => Ok(Self::Manual),
            "dynamic" => Ok(Self::Dynamic),
            other => Err(CoreError::Validation(format!(
                "Unknown coupon type '{other}'. Must be one of: manual, dynamic"
            ))),
        }
    }
}

impl std::fmt::Display for CouponType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coupon type labels keyed by type name.
pub fn coupon_type_labels() -> Vec<(&'static str, &'static str)> {
    CouponType::ALL
        .iter()
        .map(|t| (t.as_str(), t.label()))
        .collect()
}

// ---------------------------------------------------------------------------
// Integration coupon payloads
// ---------------------------------------------------------------------------

/// Display details for one coupon, as shown on the affiliate dashboard.
///
/// Carries no provider identity, so the same global coupon returned by two
/// integrations compares equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponDetails {
    pub code: String,
    pub amount: String,
}

/// A coupon returned by an integration.
///
/// Integrations return [`IntegrationCoupon::Details`] when asked for details
/// only, and their own coupon representation otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IntegrationCoupon {
    Details(CouponDetails),
    Object(serde_json::Value),
}

impl IntegrationCoupon {
    /// The coupon code, when one can be found.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Details(details) => Some(&details.code),
            Self::Object(value) => value
                .get("coupon_code")
                .or_else(|| value.get("code"))
                .and_then(|v| v.as_str()),
        }
    }

    /// The coupon amount, when one can be found.
    pub fn amount(&self) -> Option<String> {
        match self {
            Self::Details(details) => Some(details.amount.clone()),
            Self::Object(value) => value.get("amount").map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Coupon references
// ---------------------------------------------------------------------------

/// A coupon reference of mixed type: an id or a code.
///
/// Resolution precedence is: an existing coupon's id, then a numeric id, then
/// a code string. Deserializes from a JSON number or string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CouponReference {
    Id(DbId),
    Code(String),
}

impl CouponReference {
    /// Parse a path segment: all-digit strings are ids, anything else a code.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<DbId>() {
            Ok(id) if !raw.starts_with('+') => Self::Id(id),
            _ => Self::Code(raw.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Coupon template
// ---------------------------------------------------------------------------

/// The provider coupon template setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponTemplate {
    pub template_id: Option<DbId>,
    #[serde(default)]
    pub amount: String,
}

/// Whether a raw settings value counts as a configured template.
///
/// `null`, `false`, `0`, empty strings, and empty arrays or objects are all
/// treated as "not configured".
pub fn template_is_configured(value: Option<&serde_json::Value>) -> bool {
    match value {
        None | Some(serde_json::Value::Null) => false,
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(serde_json::Value::String(s)) => !s.is_empty() && s != "0",
        Some(serde_json::Value::Array(a)) => !a.is_empty(),
        Some(serde_json::Value::Object(o)) => !o.is_empty(),
    }
}

/// Extract the template amount, if the setting is an object carrying one.
pub fn template_amount(value: Option<&serde_json::Value>) -> String {
    value
        .and_then(|v| serde_json::from_value::<CouponTemplate>(v.clone()).ok())
        .map(|t| t.amount)
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Add / update preconditions
// ---------------------------------------------------------------------------

/// Check the preconditions for adding a coupon.
///
/// Fails when the template is not configured (unless `test_mode`) or when
/// the affiliate reference did not resolve.
pub fn validate_add(
    template: Option<&serde_json::Value>,
    test_mode: bool,
    affiliate_id: DbId,
    affiliate_exists: bool,
) -> Result<(), CoreError> {
    if !test_mode && !template_is_configured(template) {
        return Err(CoreError::Validation(
            "Coupon template is not configured".into(),
        ));
    }

    if affiliate_id <= 0 || !affiliate_exists {
        return Err(CoreError::NotFound {
            entity: "Affiliate",
            id: affiliate_id,
        });
    }

    Ok(())
}

/// Resolve the code to store for a new coupon.
///
/// A missing or empty code is generated (and passed through `filter`); a
/// supplied code is sanitized. The result is always uppercase.
pub fn prepare_new_code(
    requested: Option<&str>,
    filter: impl FnOnce(String) -> String,
) -> Result<String, CoreError> {
    let code = match requested {
        Some(code) if !code.is_empty() => sanitize_coupon_code(code),
        _ => filter(generate_coupon_code()),
    };
    validate_code(&code.to_uppercase())
}

/// Resolve the code for an update. `None` means the code is left unchanged.
pub fn prepare_updated_code(requested: Option<&str>) -> Result<Option<String>, CoreError> {
    match requested {
        Some(code) if !code.is_empty() => validate_code(&sanitize_coupon_code(code)).map(Some),
        _ => Ok(None),
    }
}

fn validate_code(code: &str) -> Result<String, CoreError> {
    if code.is_empty() {
        return Err(CoreError::Validation(
            "Coupon code is empty after sanitization".into(),
        ));
    }
    if code.len() > MAX_CODE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Coupon code exceeds {MAX_CODE_LENGTH} characters"
        )));
    }
    Ok(code.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
