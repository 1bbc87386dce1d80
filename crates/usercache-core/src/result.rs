//! Result type aliases for UserCache.

use crate::UserCacheError;

/// A specialized `Result` type for UserCache operations.
pub type UserCacheResult<T> = Result<T, UserCacheError>;
