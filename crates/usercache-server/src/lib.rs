//! # UserCache Server Library
//!
//! Dependency injection wiring, metrics setup, and startup utilities for the
//! server binary.

pub mod di;
pub mod observability;
pub mod startup;
