//! Digest helper for coupon query cache keys.

use sha2::{Digest, Sha256};

/// Hex SHA-256 of `prefix` followed by `payload`.
///
/// The prefix separates key spaces (list vs count) that share a payload.
pub fn prefixed_digest(prefix: &str, payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prefix.as_bytes());
    hasher.update(payload.as_bytes());
    format!("{:x}", hasher.finalize())
}
