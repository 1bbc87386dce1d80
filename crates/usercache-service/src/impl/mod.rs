//! Lookup service implementations.
//!
//! Trait definitions live in the parent module (`lookup_service.rs`).

pub mod lookup_service_impl;

pub use lookup_service_impl::{LookupServiceImpl, LookupServiceImplParameters};
