//! Repository trait definitions.

use async_trait::async_trait;
use usercache_core::{Interface, UserCacheResult, UserRecord};

/// Read-only access to the authoritative user table.
#[async_trait]
pub trait UserRepository: Interface + Send + Sync {
    /// Finds the user whose name equals `name` exactly.
    ///
    /// Returns `Ok(None)` when no row matches. Connection and query failures
    /// are reported as `StoreUnavailable`.
    async fn find_by_name(&self, name: &str) -> UserCacheResult<Option<UserRecord>>;
}
