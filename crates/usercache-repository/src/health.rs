//! Durable store health check.

use crate::ConnectionProvider;
use async_trait::async_trait;
use std::sync::Arc;
use usercache_core::{HealthCheck, HealthStatus};

/// Probes the durable store with `SELECT 1`.
pub struct DatabaseHealth {
    connector: Arc<dyn ConnectionProvider>,
}

impl DatabaseHealth {
    #[must_use]
    pub fn new(connector: Arc<dyn ConnectionProvider>) -> Self {
        Self { connector }
    }
}

#[async_trait]
impl HealthCheck for DatabaseHealth {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> HealthStatus {
        match self.connector.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}
