//! # UserCache REST
//!
//! REST API layer using Axum for UserCache.
//! Provides the search endpoints, the search page, and health checks.

pub mod controllers;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
