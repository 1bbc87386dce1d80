//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use usercache_core::{UserCacheError, UserCacheResult, UserRecord, NAME_REQUIRED};
use utoipa::ToSchema;

/// Message for unknown names, and for store outages unless they are exposed.
pub const USER_NOT_FOUND: &str = "User not found";

/// Message for store outages when they are exposed.
pub const SERVICE_UNAVAILABLE: &str = "Service unavailable";

/// Message for request bodies that are not valid JSON.
pub const INVALID_REQUEST_BODY: &str = "Invalid request body";

/// Message for unexpected failures.
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Body returned by both search endpoints, for every outcome.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<UserRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Handler time in milliseconds, rounded to two decimals.
    pub response_time_ms: f64,
}

/// Measures handler time from the moment a request is accepted.
#[derive(Debug, Clone, Copy)]
pub struct ResponseTimer {
    started: Instant,
}

impl ResponseTimer {
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Elapsed milliseconds, rounded to two decimals.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        round_ms(self.started.elapsed().as_secs_f64() * 1000.0)
    }
}

fn round_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}

/// A finished search, ready to be rendered.
#[derive(Debug)]
pub struct SearchReply {
    pub status: StatusCode,
    pub body: SearchResponse,
}

impl SearchReply {
    /// Renders a lookup result.
    pub fn from_result(
        result: UserCacheResult<UserRecord>,
        timer: ResponseTimer,
        expose_infrastructure_errors: bool,
    ) -> Self {
        match result {
            Ok(record) => Self {
                status: StatusCode::OK,
                body: SearchResponse {
                    success: true,
                    data: Some(record),
                    error: None,
                    response_time_ms: timer.elapsed_ms(),
                },
            },
            Err(e) => {
                let (status, message) = public_error(&e, expose_infrastructure_errors);
                Self::failure(status, message, timer)
            }
        }
    }

    /// Renders a request rejected before lookup.
    pub fn failure(status: StatusCode, message: impl Into<String>, timer: ResponseTimer) -> Self {
        Self {
            status,
            body: SearchResponse {
                success: false,
                data: None,
                error: Some(message.into()),
                response_time_ms: timer.elapsed_ms(),
            },
        }
    }

    /// Renders the blank-name rejection.
    pub fn name_required(timer: ResponseTimer) -> Self {
        Self::failure(StatusCode::BAD_REQUEST, NAME_REQUIRED, timer)
    }
}

impl IntoResponse for SearchReply {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Maps a lookup error to the status and message shown to clients.
///
/// Cache and store outages read as "not found" unless
/// `expose_infrastructure_errors` is set.
pub fn public_error(error: &UserCacheError, expose_infrastructure_errors: bool) -> (StatusCode, String) {
    match error {
        UserCacheError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        UserCacheError::NotFound { .. } => (StatusCode::NOT_FOUND, USER_NOT_FOUND.to_string()),
        e if e.is_infrastructure() => {
            if expose_infrastructure_errors {
                (StatusCode::SERVICE_UNAVAILABLE, SERVICE_UNAVAILABLE.to_string())
            } else {
                (StatusCode::NOT_FOUND, USER_NOT_FOUND.to_string())
            }
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string()),
    }
}
