//! Cache-aside lookup implementation.

use crate::cache::{CacheStore, CacheStoreExt};
use crate::lookup_service::LookupService;
use crate::metrics::LookupMetrics;
use async_trait::async_trait;
use shaku::Component;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use usercache_config::{CacheFailurePolicy, LookupConfig};
use usercache_core::{require_lookup_key, UserCacheError, UserCacheResult, UserRecord};
use usercache_repository::UserRepository;

/// Result of consulting the cache.
enum CacheRead {
    Hit(UserRecord),
    Miss,
    /// The cache was unreachable and the policy allows skipping it.
    Bypassed,
}

/// Lookup service component for Shaku DI.
///
/// Reads the cache first; on a miss reads the durable store and writes the
/// row back into the cache before returning it.
#[derive(Component)]
#[shaku(interface = LookupService)]
pub struct LookupServiceImpl {
    #[shaku(inject)]
    cache: Arc<dyn CacheStore>,
    #[shaku(inject)]
    repository: Arc<dyn UserRepository>,
    config: LookupConfig,
}

impl LookupServiceImpl {
    /// Creates a lookup service over explicit stores.
    #[must_use]
    pub fn new(
        cache: Arc<dyn CacheStore>,
        repository: Arc<dyn UserRepository>,
        config: LookupConfig,
    ) -> Self {
        Self {
            cache,
            repository,
            config,
        }
    }

    async fn read_cache(&self, key: &str) -> UserCacheResult<CacheRead> {
        match self.cache.get::<UserRecord>(key).await {
            Ok(Some(record)) => Ok(CacheRead::Hit(record)),
            Ok(None) => Ok(CacheRead::Miss),
            Err(UserCacheError::Serialization(msg)) => {
                warn!("Discarding unreadable cache entry for '{}': {}", key, msg);
                LookupMetrics::cache_corrupt();
                Ok(CacheRead::Miss)
            }
            Err(e) => match self.config.cache_failure_policy {
                CacheFailurePolicy::Fail => Err(e),
                CacheFailurePolicy::Bypass => {
                    warn!("Cache unavailable, reading '{}' from durable store only: {}", key, e);
                    LookupMetrics::cache_bypassed();
                    Ok(CacheRead::Bypassed)
                }
            },
        }
    }

    async fn write_back(&self, key: &str, record: &UserRecord) {
        if !self.cache.is_enabled() {
            debug!("Cache disabled, not caching user '{}'", key);
            return;
        }

        match self.cache.set(key, record, self.config.cache_ttl()).await {
            Ok(()) => info!("Cached user '{}'", key),
            Err(e) => {
                warn!("Failed to cache user '{}': {}", key, e);
                LookupMetrics::write_back_failed();
            }
        }
    }

    async fn resolve(&self, key: &str) -> UserCacheResult<(UserRecord, &'static str)> {
        let write_back = match self.read_cache(key).await? {
            CacheRead::Hit(record) => {
                debug!("Cache hit for user: {}", key);
                LookupMetrics::cache_hit();
                return Ok((record, "cache_hit"));
            }
            CacheRead::Miss => {
                debug!("Cache miss for user: {}", key);
                LookupMetrics::cache_miss();
                true
            }
            CacheRead::Bypassed => false,
        };

        let record = self
            .repository
            .find_by_name(key)
            .await?
            .ok_or_else(|| UserCacheError::not_found("User", key))?;
        LookupMetrics::store_hit();

        if write_back {
            self.write_back(key, &record).await;
        }

        Ok((record, "store_hit"))
    }
}

#[async_trait]
impl LookupService for LookupServiceImpl {
    async fn lookup(&self, key: &str) -> UserCacheResult<UserRecord> {
        require_lookup_key(key)?;

        let started = Instant::now();
        let result = self.resolve(key).await;

        match &result {
            Ok((_, outcome)) => LookupMetrics::lookup_duration(*outcome, started.elapsed()),
            Err(UserCacheError::NotFound { .. }) => {
                debug!("User not found: {}", key);
                LookupMetrics::not_found();
                LookupMetrics::lookup_duration("not_found", started.elapsed());
            }
            Err(e) => {
                warn!("Lookup for '{}' failed: {}", key, e);
                LookupMetrics::lookup_failed(e.error_code());
                LookupMetrics::lookup_duration("error", started.elapsed());
            }
        }

        result.map(|(record, _)| record)
    }
}

impl std::fmt::Debug for LookupServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupServiceImpl")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryCacheStore;
    use mockall::mock;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory durable store counting every query.
    struct CountingRepository {
        users: HashMap<String, UserRecord>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingRepository {
        fn with_users(users: Vec<UserRecord>) -> Self {
            Self {
                users: users.into_iter().map(|u| (u.name.clone(), u)).collect(),
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::with_users(vec![])
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl UserRepository for CountingRepository {
        async fn find_by_name(&self, name: &str) -> UserCacheResult<Option<UserRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(UserCacheError::store_unavailable("connection refused"));
            }
            Ok(self.users.get(name).cloned())
        }
    }

    /// Cache whose reads and writes can be made to fail independently.
    #[derive(Default)]
    struct FlakyCache {
        inner: InMemoryCacheStore,
        fail_reads: bool,
        fail_writes: bool,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl CacheStore for FlakyCache {
        async fn get_raw(&self, key: &str) -> UserCacheResult<Option<String>> {
            if self.fail_reads {
                return Err(UserCacheError::cache_unavailable("connection refused"));
            }
            self.inner.get_raw(key).await
        }

        async fn set_raw(
            &self,
            key: &str,
            value: &str,
            ttl: Option<Duration>,
        ) -> UserCacheResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes {
                return Err(UserCacheError::cache_unavailable("connection refused"));
            }
            self.inner.set_raw(key, value, ttl).await
        }

        async fn ping(&self) -> UserCacheResult<()> {
            Ok(())
        }

        fn is_enabled(&self) -> bool {
            true
        }
    }

    mock! {
        Repository {}

        #[async_trait]
        impl UserRepository for Repository {
            async fn find_by_name(&self, name: &str) -> UserCacheResult<Option<UserRecord>>;
        }
    }

    mock! {
        Cache {}

        #[async_trait]
        impl CacheStore for Cache {
            async fn get_raw(&self, key: &str) -> UserCacheResult<Option<String>>;
            async fn set_raw(&self, key: &str, value: &str, ttl: Option<Duration>) -> UserCacheResult<()>;
            async fn ping(&self) -> UserCacheResult<()>;
            fn is_enabled(&self) -> bool;
        }
    }

    fn alice() -> UserRecord {
        UserRecord::new("Alice", "Engineer", 30, "USA")
    }

    fn create_service(
        cache: Arc<dyn CacheStore>,
        repository: Arc<dyn UserRepository>,
    ) -> LookupServiceImpl {
        LookupServiceImpl::new(cache, repository, LookupConfig::default())
    }

    #[tokio::test]
    async fn test_miss_reads_store_and_writes_back() {
        let cache = Arc::new(InMemoryCacheStore::new());
        let repo = Arc::new(CountingRepository::with_users(vec![alice()]));
        let service = create_service(cache.clone(), repo.clone());

        let record = service.lookup("Alice").await.unwrap();

        assert_eq!(record, alice());
        assert_eq!(repo.calls(), 1);

        let cached = cache.get_raw("Alice").await.unwrap().unwrap();
        let decoded: UserRecord = serde_json::from_str(&cached).unwrap();
        assert_eq!(decoded, alice());
    }

    #[tokio::test]
    async fn test_second_lookup_skips_store() {
        let cache = Arc::new(InMemoryCacheStore::new());
        let repo = Arc::new(CountingRepository::with_users(vec![alice()]));
        let service = create_service(cache, repo.clone());

        let first = service.lookup("Alice").await.unwrap();
        let second = service.lookup("Alice").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(repo.calls(), 1);
    }

    #[tokio::test]
    async fn test_cache_hit_never_touches_store() {
        let cache = Arc::new(InMemoryCacheStore::new());
        cache.set("Alice", &alice(), None).await.unwrap();

        let mut repo = MockRepository::new();
        repo.expect_find_by_name().never();

        let service = create_service(cache, Arc::new(repo));
        assert_eq!(service.lookup("Alice").await.unwrap(), alice());
    }

    #[tokio::test]
    async fn test_unknown_key_is_not_found_and_not_cached() {
        let mut cache = MockCache::new();
        cache.expect_get_raw().times(1).returning(|_| Ok(None));
        cache.expect_set_raw().never();

        let repo = Arc::new(CountingRepository::with_users(vec![alice()]));
        let service = create_service(Arc::new(cache), repo.clone());

        let err = service.lookup("Bob").await.unwrap_err();

        assert!(matches!(err, UserCacheError::NotFound { .. }));
        assert_eq!(repo.calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_key_rejected_before_any_store_access() {
        let mut cache = MockCache::new();
        cache.expect_get_raw().never();
        cache.expect_set_raw().never();
        let mut repo = MockRepository::new();
        repo.expect_find_by_name().never();

        let service = create_service(Arc::new(cache), Arc::new(repo));

        for key in ["", "   ", "\t\n"] {
            let err = service.lookup(key).await.unwrap_err();
            assert!(matches!(err, UserCacheError::InvalidInput(ref msg) if msg == "Name is required"));
        }
    }

    #[tokio::test]
    async fn test_key_is_not_trimmed() {
        let repo = Arc::new(CountingRepository::with_users(vec![alice()]));
        let service = create_service(Arc::new(InMemoryCacheStore::new()), repo);

        let err = service.lookup(" Alice ").await.unwrap_err();
        assert!(matches!(err, UserCacheError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_cache_failure_fails_lookup_by_default() {
        let cache = Arc::new(FlakyCache {
            fail_reads: true,
            ..FlakyCache::default()
        });
        let repo = Arc::new(CountingRepository::with_users(vec![alice()]));
        let service = create_service(cache, repo.clone());

        let err = service.lookup("Alice").await.unwrap_err();

        assert!(matches!(err, UserCacheError::CacheUnavailable(_)));
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_bypass_policy_reads_store_without_write_back() {
        let cache = Arc::new(FlakyCache {
            fail_reads: true,
            ..FlakyCache::default()
        });
        let repo = Arc::new(CountingRepository::with_users(vec![alice()]));
        let config = LookupConfig {
            cache_failure_policy: CacheFailurePolicy::Bypass,
            ..LookupConfig::default()
        };
        let service = LookupServiceImpl::new(cache.clone(), repo.clone(), config);

        assert_eq!(service.lookup("Alice").await.unwrap(), alice());
        assert_eq!(repo.calls(), 1);
        assert_eq!(cache.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_write_back_failure_still_returns_record() {
        let cache = Arc::new(FlakyCache {
            fail_writes: true,
            ..FlakyCache::default()
        });
        let repo = Arc::new(CountingRepository::with_users(vec![alice()]));
        let service = create_service(cache.clone(), repo);

        assert_eq!(service.lookup("Alice").await.unwrap(), alice());
        assert_eq!(cache.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_store_failure_is_store_unavailable() {
        let service = create_service(
            Arc::new(InMemoryCacheStore::new()),
            Arc::new(CountingRepository::failing()),
        );

        let err = service.lookup("Alice").await.unwrap_err();
        assert!(matches!(err, UserCacheError::StoreUnavailable(_)));
        assert!(err.is_infrastructure());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_repaired() {
        let cache = Arc::new(InMemoryCacheStore::new());
        cache.set_raw("Alice", "{not json", None).await.unwrap();
        let repo = Arc::new(CountingRepository::with_users(vec![alice()]));
        let service = create_service(cache.clone(), repo.clone());

        assert_eq!(service.lookup("Alice").await.unwrap(), alice());
        assert_eq!(repo.calls(), 1);

        let repaired: Option<UserRecord> = cache.get("Alice").await.unwrap();
        assert_eq!(repaired, Some(alice()));
    }

    #[tokio::test]
    async fn test_write_back_uses_configured_ttl() {
        let mut cache = MockCache::new();
        cache.expect_get_raw().returning(|_| Ok(None));
        cache.expect_is_enabled().return_const(true);
        cache
            .expect_set_raw()
            .withf(|key, _, ttl| key.to_string() == "Alice" && *ttl == Some(Duration::from_secs(60)))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let repo = Arc::new(CountingRepository::with_users(vec![alice()]));
        let config = LookupConfig {
            cache_ttl_secs: Some(60),
            ..LookupConfig::default()
        };
        let service = LookupServiceImpl::new(Arc::new(cache), repo, config);

        service.lookup("Alice").await.unwrap();
    }

    #[tokio::test]
    async fn test_write_back_without_ttl_by_default() {
        let mut cache = MockCache::new();
        cache.expect_get_raw().returning(|_| Ok(None));
        cache.expect_is_enabled().return_const(true);
        cache
            .expect_set_raw()
            .withf(|_, value, ttl| ttl.is_none() && value.contains("\"age\":30"))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let repo = Arc::new(CountingRepository::with_users(vec![alice()]));
        let service = create_service(Arc::new(cache), repo);

        service.lookup("Alice").await.unwrap();
    }

    #[tokio::test]
    async fn test_row_decode_failure_is_store_unavailable() {
        let mut cache = MockCache::new();
        cache.expect_get_raw().returning(|_| Ok(None));
        cache.expect_set_raw().never();

        let mut repo = MockRepository::new();
        repo.expect_find_by_name().times(1).returning(|_| {
            Err(sqlx::Error::ColumnDecode {
                index: "age".to_string(),
                source: "i32 not compatible with INT UNSIGNED".into(),
            }
            .into())
        });

        let service = create_service(Arc::new(cache), Arc::new(repo));
        let err = service.lookup("Alice").await.unwrap_err();

        assert!(matches!(err, UserCacheError::StoreUnavailable(_)));
        assert!(err.is_infrastructure());
    }

    #[tokio::test]
    async fn test_disabled_cache_skips_write_back() {
        let mut cache = MockCache::new();
        cache.expect_get_raw().returning(|_| Ok(None));
        cache.expect_is_enabled().return_const(false);
        cache.expect_set_raw().never();

        let repo = Arc::new(CountingRepository::with_users(vec![alice()]));
        let service = create_service(Arc::new(cache), repo.clone());

        assert_eq!(service.lookup("Alice").await.unwrap(), alice());
        assert_eq!(repo.calls(), 1);
    }
}
