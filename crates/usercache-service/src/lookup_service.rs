//! Lookup service trait definition.

use async_trait::async_trait;
use usercache_core::{Interface, UserCacheResult, UserRecord};

/// Resolves a user name to its record, reading through the cache.
#[async_trait]
pub trait LookupService: Interface + Send + Sync {
    /// Looks up a record by its exact name.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `key` is empty or whitespace-only
    /// - `NotFound` if neither store holds the key
    /// - `CacheUnavailable` / `StoreUnavailable` on infrastructure failure
    async fn lookup(&self, key: &str) -> UserCacheResult<UserRecord>;
}
