//! Application state for Axum handlers.

use shaku::HasComponent;
use std::sync::Arc;
use usercache_core::HealthCheck;
use usercache_repository::{ConnectionProvider, DatabaseHealth};
use usercache_service::{CacheHealth, CacheStore, LookupService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub lookup_service: Arc<dyn LookupService>,
    /// Probes run by the readiness endpoint.
    pub health_checks: Arc<Vec<Arc<dyn HealthCheck>>>,
    /// Report cache/store outages as 503 instead of 404.
    pub expose_infrastructure_errors: bool,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        lookup_service: Arc<dyn LookupService>,
        health_checks: Vec<Arc<dyn HealthCheck>>,
    ) -> Self {
        Self {
            lookup_service,
            health_checks: Arc::new(health_checks),
            expose_infrastructure_errors: false,
        }
    }

    /// Sets whether infrastructure failures are surfaced as 503.
    #[must_use]
    pub fn with_infrastructure_errors(mut self, expose: bool) -> Self {
        self.expose_infrastructure_errors = expose;
        self
    }

    /// Resolves services and health probes from a Shaku module.
    pub fn from_module<M>(module: &M) -> Self
    where
        M: HasComponent<dyn LookupService>
            + HasComponent<dyn CacheStore>
            + HasComponent<dyn ConnectionProvider>,
    {
        let lookup_service: Arc<dyn LookupService> = module.resolve();
        let cache: Arc<dyn CacheStore> = module.resolve();
        let connector: Arc<dyn ConnectionProvider> = module.resolve();

        Self::new(
            lookup_service,
            vec![
                Arc::new(CacheHealth::new(cache)),
                Arc::new(DatabaseHealth::new(connector)),
            ],
        )
    }
}
