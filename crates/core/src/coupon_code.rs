//! Coupon code sanitization and generation.
//!
//! Codes are always stored and compared uppercase. Sanitizing lowercases the
//! raw input, keeps only `[a-z0-9_-]`, then uppercases the result.

use rand::Rng;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Length of an auto-generated coupon code.
pub const GENERATED_CODE_LENGTH: usize = 10;

/// Maximum length of a stored coupon code (`coupons.coupon_code VARCHAR(50)`).
pub const MAX_CODE_LENGTH: usize = 50;

// ---------------------------------------------------------------------------
// Sanitization
// ---------------------------------------------------------------------------

/// Sanitize a raw coupon code into its canonical stored form.
///
/// ```
/// use coupons_core::coupon_code::sanitize_coupon_code;
///
/// assert_eq!(sanitize_coupon_code("Summer 20%"), "SUMMER20");
/// assert_eq!(sanitize_coupon_code("spring_sale-2"), "SPRING_SALE-2");
/// ```
pub fn sanitize_coupon_code(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == '-')
        .collect::<String>()
        .to_uppercase()
}

/// Normalize a code for an exact-match lookup without stripping characters.
pub fn normalize_for_lookup(code: &str) -> String {
    code.to_uppercase()
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate a random coupon code of [`GENERATED_CODE_LENGTH`] characters.
///
/// The raw alphanumeric string is passed through [`sanitize_coupon_code`], so
/// the result is always uppercase.
pub fn generate_coupon_code() -> String {
    let raw: String = rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(GENERATED_CODE_LENGTH)
        .map(char::from)
        .collect();

    sanitize_coupon_code(&raw)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
