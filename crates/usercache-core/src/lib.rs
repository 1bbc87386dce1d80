//! # UserCache Core
//!
//! Core types, traits, and error definitions for UserCache.
//! Every other crate in the workspace builds on the record type and the
//! unified error defined here.

pub mod domain;
pub mod error;
pub mod logging;
pub mod result;
pub mod traits;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use logging::*;
pub use result::*;
pub use traits::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::{HasComponent, Interface};
