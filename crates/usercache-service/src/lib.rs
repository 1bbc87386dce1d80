//! # UserCache Service
//!
//! The cache-aside lookup and the cache store adapters it reads through.

pub mod cache;
pub mod health;
pub mod r#impl;
pub mod lookup_service;
pub mod metrics;

pub use cache::*;
pub use health::*;
pub use lookup_service::*;
pub use self::metrics::{register_metrics, LookupMetrics};
pub use r#impl::{LookupServiceImpl, LookupServiceImplParameters};
