//! Validation utilities.

use crate::{UserCacheError, UserCacheResult};

/// Message reported when a lookup key is missing or blank.
pub const NAME_REQUIRED: &str = "Name is required";

/// Rejects keys that are empty or whitespace-only.
///
/// The key is not trimmed here; callers that want trimming do it before the
/// lookup.
pub fn require_lookup_key(key: &str) -> UserCacheResult<()> {
    if rules::not_blank(key) {
        Ok(())
    } else {
        Err(UserCacheError::invalid_input(NAME_REQUIRED))
    }
}

/// Common validation functions.
pub mod rules {
    /// Returns true if the string is not empty after trimming.
    #[must_use]
    pub fn not_blank(value: &str) -> bool {
        !value.trim().is_empty()
    }
}
