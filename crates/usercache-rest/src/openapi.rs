//! OpenAPI documentation configuration.

use crate::controllers::{ComponentHealth, HealthResponse, ReadinessResponse, SearchRequest};
use crate::responses::SearchResponse;
use usercache_core::UserRecord;
use utoipa::OpenApi;

/// OpenAPI documentation for the UserCache API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "UserCache API",
        version = "1.0.0",
        description = "Read-through cached user lookup",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        crate::controllers::search_controller::search_user,
        crate::controllers::search_controller::search_user_by_path,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            UserRecord,
            SearchRequest,
            SearchResponse,
            HealthResponse,
            ReadinessResponse,
            ComponentHealth,
        )
    ),
    tags(
        (name = "search", description = "User lookup endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
