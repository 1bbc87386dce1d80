//! Cache store health check.

use crate::CacheStore;
use async_trait::async_trait;
use std::sync::Arc;
use usercache_core::{HealthCheck, HealthStatus};

/// Probes the cache store with `PING`.
///
/// A disabled cache reports `Degraded`, which does not fail readiness.
pub struct CacheHealth {
    cache: Arc<dyn CacheStore>,
}

impl CacheHealth {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl HealthCheck for CacheHealth {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        if !self.cache.is_enabled() {
            return HealthStatus::Degraded("cache disabled".to_string());
        }
        match self.cache.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}
