//! Main application router.

use crate::{
    controllers::{health_controller, index_controller, search_controller},
    middleware::{logging_middleware, REQUEST_ID_HEADER},
    openapi::ApiDoc,
    state::AppState,
};
use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use shaku::{HasComponent, Module};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use usercache_config::{ObservabilityConfig, ServerConfig};
use usercache_repository::ConnectionProvider;
use usercache_service::{CacheStore, LookupService};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router from a Shaku module.
///
/// The module must provide the lookup service and the two stores it reads,
/// which also back the readiness probe.
pub fn create_router<M>(
    module: &M,
    server_config: &ServerConfig,
    observability: &ObservabilityConfig,
    metrics: Option<PrometheusHandle>,
) -> Router
where
    M: Module
        + HasComponent<dyn LookupService>
        + HasComponent<dyn CacheStore>
        + HasComponent<dyn ConnectionProvider>,
{
    let state = AppState::from_module(module)
        .with_infrastructure_errors(server_config.expose_infrastructure_errors);

    let mut router = build_router(state, server_config);

    if let Some(handle) = metrics {
        router = router.merge(metrics_router(&observability.metrics_path, handle));
        info!("Prometheus metrics exposed at {}", observability.metrics_path);
    }

    router
}

/// Builds the router over an existing state.
pub fn build_router(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let router = Router::new()
        // Search page
        .route("/", get(index_controller::index))
        // Search API
        .nest("/api/search", search_controller::router())
        // Health endpoints
        .merge(health_controller::router())
        .with_state(state)
        // Swagger UI and OpenAPI spec
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware layers
        .layer(middleware::from_fn(logging_middleware))
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid));

    info!("Router created with search endpoints and Swagger UI at /swagger-ui");
    router
}

fn metrics_router(path: &str, handle: PrometheusHandle) -> Router {
    Router::new().route(
        path,
        get(move || {
            let handle = handle.clone();
            async move { (StatusCode::OK, handle.render()) }
        }),
    )
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    if server_config.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
