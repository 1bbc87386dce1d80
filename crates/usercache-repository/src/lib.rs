//! # UserCache Repository
//!
//! Read access to the durable user store.
//!
//! ```text
//! LookupService
//!   ↓  Arc<dyn UserRepository>
//! MySqlUserRepository
//!   ↓  Arc<dyn ConnectionProvider>
//! DatabaseConnector          (per-lookup connection or shared pool)
//!   ↓
//! MySQL
//! ```

pub mod connector;
pub mod health;
pub mod mysql;
pub mod traits;

pub use connector::*;
pub use health::*;
pub use mysql::*;
pub use traits::*;
