//! Unified error types for all layers of the application.

use thiserror::Error;

/// Unified error type for UserCache.
///
/// The lookup path distinguishes "the record does not exist" from "a backing
/// store could not be reached" internally. Whether the HTTP layer reports the
/// two differently is a presentation decision (see `usercache-rest`).
#[derive(Error, Debug)]
pub enum UserCacheError {
    // ============ Domain Errors ============
    /// Empty or malformed lookup input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found in either store.
    #[error("Resource not found: {resource_type} with key {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    // ============ Infrastructure Errors ============
    /// The cache store could not be reached or rejected a command.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// The durable store could not be reached or a query failed.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl UserCacheError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound { .. } => 404,
            Self::CacheUnavailable(_) | Self::StoreUnavailable(_) => 503,
            Self::Serialization(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::CacheUnavailable(_) => "CACHE_UNAVAILABLE",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input<T: Into<String>>(message: T) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a cache unavailable error.
    #[must_use]
    pub fn cache_unavailable<T: Into<String>>(message: T) -> Self {
        Self::CacheUnavailable(message.into())
    }

    /// Creates a store unavailable error.
    #[must_use]
    pub fn store_unavailable<T: Into<String>>(message: T) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// True when the error comes from a backing store rather than the request.
    #[must_use]
    pub const fn is_infrastructure(&self) -> bool {
        matches!(self, Self::CacheUnavailable(_) | Self::StoreUnavailable(_))
    }
}

/// Any durable store failure, row decoding included, is `StoreUnavailable`.
#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for UserCacheError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for UserCacheError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(format!("JSON serialization error: {}", err))
    }
}
