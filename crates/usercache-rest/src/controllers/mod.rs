//! REST API controllers.

pub mod health_controller;
pub mod index_controller;
pub mod search_controller;

pub use health_controller::*;
pub use search_controller::SearchRequest;
