//! Structured logging setup.
//!
//! The subscriber is only compiled with the `logging` feature so library
//! crates can depend on `usercache-core` without pulling in
//! `tracing-subscriber`.

use crate::UserCacheResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, one event per line.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set.
#[cfg(feature = "logging")]
pub fn init_logging(level: &str, format: LogFormat) -> UserCacheResult<()> {
    use crate::UserCacheError;
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| {
            UserCacheError::Configuration(format!("Invalid log filter '{}': {}", level, e))
        })?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init(),
    };

    result.map_err(|e| UserCacheError::internal(format!("Failed to initialize logging: {}", e)))?;

    tracing::info!(format = %format, "Logging initialized");
    Ok(())
}

/// Placeholder for when the logging feature is disabled.
#[cfg(not(feature = "logging"))]
pub fn init_logging(_level: &str, _format: LogFormat) -> UserCacheResult<()> {
    Ok(())
}
