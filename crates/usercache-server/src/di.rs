//! Dependency injection module using Shaku.

use shaku::module;
use std::sync::Arc;
use tracing::info;
use usercache_config::AppConfig;
use usercache_core::UserCacheResult;
use usercache_repository::{DatabaseConnector, MySqlUserRepository};
use usercache_service::{
    CacheStore, InMemoryCacheStore, LookupServiceImpl, LookupServiceImplParameters,
    RedisCacheStore,
};

// Lookup module: durable store, cache store, and the lookup service reading
// through them.
module! {
    pub LookupModule {
        components = [
            DatabaseConnector,
            MySqlUserRepository,
            RedisCacheStore,
            LookupServiceImpl,
        ],
        providers = [],
    }
}

/// Which cache backend a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    InMemory,
    Disabled,
}

impl CacheBackend {
    /// Resolves the backend from configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        if config.redis.enabled {
            Self::Redis
        } else if config.lookup.in_memory_fallback {
            Self::InMemory
        } else {
            Self::Disabled
        }
    }
}

impl std::fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redis => write!(f, "redis"),
            Self::InMemory => write!(f, "in-memory"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Builds the lookup module from configuration.
///
/// In `pooled` mode this connects to MySQL; in `per_lookup` mode no
/// connection is made until the first lookup. Redis connects lazily.
pub async fn build_lookup_module(config: &AppConfig) -> UserCacheResult<Arc<LookupModule>> {
    let connector = DatabaseConnector::connect(&config.database).await?;

    let builder = LookupModule::builder()
        .with_component_parameters::<DatabaseConnector>(connector.into_parameters())
        .with_component_parameters::<LookupServiceImpl>(LookupServiceImplParameters {
            config: config.lookup.clone(),
        });

    let backend = CacheBackend::from_config(config);
    info!("Cache backend: {}", backend);

    let builder = match backend {
        CacheBackend::Redis => builder.with_component_parameters::<RedisCacheStore>(
            RedisCacheStore::from_config(&config.redis)?.into_parameters(),
        ),
        CacheBackend::InMemory => builder
            .with_component_override::<dyn CacheStore>(Box::new(InMemoryCacheStore::new())),
        CacheBackend::Disabled => builder.with_component_parameters::<RedisCacheStore>(
            RedisCacheStore::disabled().into_parameters(),
        ),
    };

    Ok(Arc::new(builder.build()))
}
