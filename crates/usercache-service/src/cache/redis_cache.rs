//! Redis-based cache store.

use super::CacheStore;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool, PoolConfig, Runtime};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use usercache_config::RedisConfig;
use usercache_core::{UserCacheError, UserCacheResult};

/// Redis-based cache store.
///
/// Entries are plain string keys holding JSON values. With no pool the store
/// is disabled: reads miss and writes are dropped.
#[derive(Component)]
#[shaku(interface = CacheStore)]
pub struct RedisCacheStore {
    /// Redis connection pool.
    pool: Option<Arc<Pool>>,
}

impl RedisCacheStore {
    /// Create a new Redis cache store.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a no-op cache store (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Creates the store from configuration.
    ///
    /// The pool connects lazily, so an unreachable Redis surfaces on the first
    /// command rather than here.
    pub fn from_config(config: &RedisConfig) -> UserCacheResult<Self> {
        if !config.enabled {
            info!("Redis cache disabled");
            return Ok(Self::disabled());
        }

        let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
        redis_cfg.pool = Some(PoolConfig::new(config.pool_size));
        let pool = redis_cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| {
                UserCacheError::Configuration(format!("Failed to create Redis pool: {}", e))
            })?;

        info!("Redis connection pool created (max size {})", config.pool_size);
        Ok(Self::new(Arc::new(pool)))
    }

    /// Converts into Shaku component parameters.
    #[must_use]
    pub fn into_parameters(self) -> RedisCacheStoreParameters {
        RedisCacheStoreParameters { pool: self.pool }
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> UserCacheResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                UserCacheError::cache_unavailable(format!("Failed to get Redis connection: {}", e))
            }),
            None => Err(UserCacheError::cache_unavailable("Cache is disabled")),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> UserCacheResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn.get(key).await.map_err(|e| {
            UserCacheError::cache_unavailable(format!("Failed to get key '{}': {}", key, e))
        })?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> UserCacheResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;

        match ttl {
            Some(ttl) => {
                let ttl_secs = ttl.as_secs().max(1);
                conn.set_ex::<_, _, ()>(key, value, ttl_secs)
                    .await
                    .map_err(|e| {
                        UserCacheError::cache_unavailable(format!(
                            "Failed to set key '{}': {}",
                            key, e
                        ))
                    })?;
                debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
            }
            None => {
                conn.set::<_, _, ()>(key, value).await.map_err(|e| {
                    UserCacheError::cache_unavailable(format!("Failed to set key '{}': {}", key, e))
                })?;
                debug!("Cached key '{}' without expiry", key);
            }
        }

        Ok(())
    }

    async fn ping(&self) -> UserCacheResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let mut conn = self.get_conn().await?;
        let _pong: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| UserCacheError::cache_unavailable(format!("PING failed: {}", e)))?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("RedisCacheStore");
        s.field("enabled", &self.is_enabled());
        if let Some(pool) = &self.pool {
            let status = pool.status();
            s.field("size", &status.size)
                .field("available", &status.available);
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_cache_misses_and_drops_writes() {
        let cache = RedisCacheStore::disabled();
        assert!(!cache.is_enabled());

        cache.set_raw("Alice", "{}", None).await.unwrap();
        assert!(cache.get_raw("Alice").await.unwrap().is_none());
        assert!(cache.ping().await.is_ok());
    }

    #[test]
    fn test_from_config_respects_enabled_flag() {
        let config = RedisConfig {
            enabled: false,
            ..RedisConfig::default()
        };
        assert!(!RedisCacheStore::from_config(&config).unwrap().is_enabled());
    }

    #[tokio::test]
    async fn test_unreachable_redis_is_cache_unavailable() {
        // Nothing listens on port 1.
        let config = RedisConfig {
            url: "redis://127.0.0.1:1/0".to_string(),
            pool_size: 1,
            enabled: true,
        };
        let cache = RedisCacheStore::from_config(&config).unwrap();
        assert!(cache.is_enabled());

        let err = cache.get_raw("Alice").await.unwrap_err();
        assert!(matches!(err, UserCacheError::CacheUnavailable(_)));
        assert!(cache.ping().await.is_err());
    }
}
