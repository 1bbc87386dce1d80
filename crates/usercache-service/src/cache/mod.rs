//! Caching infrastructure for the service layer.
//!
//! Lookups read through a [`CacheStore`]. Redis is the production backend;
//! the in-memory store serves local development and tests.

mod cache_store;
mod memory_cache;
mod redis_cache;

pub use cache_store::{CacheStore, CacheStoreExt};
pub use memory_cache::InMemoryCacheStore;
pub use redis_cache::{RedisCacheStore, RedisCacheStoreParameters};
