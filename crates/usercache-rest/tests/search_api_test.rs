//! HTTP-level tests for the search and health endpoints.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use usercache_config::ServerConfig;
use usercache_core::{HealthCheck, HealthStatus, UserCacheError, UserCacheResult, UserRecord};
use usercache_rest::{build_router, AppState};
use usercache_service::LookupService;

/// Lookup service answering from fixed keys and recording what it was asked.
#[derive(Default)]
struct FakeLookupService {
    keys: Mutex<Vec<String>>,
}

impl FakeLookupService {
    fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl LookupService for FakeLookupService {
    async fn lookup(&self, key: &str) -> UserCacheResult<UserRecord> {
        self.keys.lock().unwrap().push(key.to_string());
        match key {
            "Alice" => Ok(UserRecord::new("Alice", "Engineer", 30, "USA")),
            "store-down" => Err(UserCacheError::store_unavailable("connection refused")),
            "cache-down" => Err(UserCacheError::cache_unavailable("connection refused")),
            _ => Err(UserCacheError::not_found("User", key)),
        }
    }
}

struct StaticHealth {
    name: &'static str,
    status: HealthStatus,
}

#[async_trait]
impl HealthCheck for StaticHealth {
    fn name(&self) -> &str {
        self.name
    }

    async fn check(&self) -> HealthStatus {
        self.status.clone()
    }
}

fn health(name: &'static str, status: HealthStatus) -> Arc<dyn HealthCheck> {
    Arc::new(StaticHealth { name, status })
}

fn create_app(service: Arc<FakeLookupService>, expose: bool) -> Router {
    let state = AppState::new(
        service,
        vec![
            health("cache", HealthStatus::Healthy),
            health("database", HealthStatus::Healthy),
        ],
    )
    .with_infrastructure_errors(expose);
    build_router(state, &ServerConfig::default())
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn assert_has_timing(body: &Value) {
    let ms = body["response_time_ms"].as_f64().expect("response_time_ms missing");
    assert!(ms >= 0.0);
}

#[tokio::test]
async fn test_post_found() {
    let service = Arc::new(FakeLookupService::default());
    let (status, body) =
        send_json(create_app(service, false), post_json(r#"{"name":"Alice"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["data"],
        json!({"name": "Alice", "profession": "Engineer", "age": 30, "country": "USA"})
    );
    assert!(body.get("error").is_none());
    assert_has_timing(&body);
}

#[tokio::test]
async fn test_post_trims_name() {
    let service = Arc::new(FakeLookupService::default());
    let (status, _) = send_json(
        create_app(service.clone(), false),
        post_json(r#"{"name":"  Alice  "}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(service.keys(), vec!["Alice".to_string()]);
}

#[tokio::test]
async fn test_post_blank_name_is_rejected() {
    for payload in [r#"{"name":"   "}"#, r#"{"name":""}"#, r#"{}"#, r#"{"name":null}"#] {
        let service = Arc::new(FakeLookupService::default());
        let (status, body) = send_json(create_app(service.clone(), false), post_json(payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
        assert_eq!(body["error"], "Name is required");
        assert_eq!(body["success"], false);
        assert_has_timing(&body);
        assert!(service.keys().is_empty());
    }
}

#[tokio::test]
async fn test_post_invalid_json() {
    let service = Arc::new(FakeLookupService::default());
    let (status, body) =
        send_json(create_app(service.clone(), false), post_json("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");
    assert_has_timing(&body);
    assert!(service.keys().is_empty());
}

#[tokio::test]
async fn test_post_not_found() {
    let service = Arc::new(FakeLookupService::default());
    let (status, body) =
        send_json(create_app(service, false), post_json(r#"{"name":"Bob"}"#)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "User not found");
    assert!(body.get("data").is_none());
    assert_has_timing(&body);
}

#[tokio::test]
async fn test_get_found() {
    let service = Arc::new(FakeLookupService::default());
    let (status, body) = send_json(create_app(service, false), get("/api/search/Alice")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Alice");
    assert_has_timing(&body);
}

#[tokio::test]
async fn test_get_blank_name_is_rejected() {
    let service = Arc::new(FakeLookupService::default());
    let (status, body) =
        send_json(create_app(service.clone(), false), get("/api/search/%20%20")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is required");
    assert!(service.keys().is_empty());
}

#[tokio::test]
async fn test_get_uses_segment_as_given() {
    let service = Arc::new(FakeLookupService::default());
    let (status, _) =
        send_json(create_app(service.clone(), false), get("/api/search/%20Alice")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(service.keys(), vec![" Alice".to_string()]);
}

#[tokio::test]
async fn test_get_decodes_spaces_in_name() {
    let service = Arc::new(FakeLookupService::default());
    send_json(create_app(service.clone(), false), get("/api/search/Bob%20Smith")).await;

    assert_eq!(service.keys(), vec!["Bob Smith".to_string()]);
}

#[tokio::test]
async fn test_infrastructure_errors_read_as_not_found_by_default() {
    for name in ["store-down", "cache-down"] {
        let service = Arc::new(FakeLookupService::default());
        let uri = format!("/api/search/{}", name);
        let (status, body) = send_json(create_app(service, false), get(&uri)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found");
    }
}

#[tokio::test]
async fn test_infrastructure_errors_exposed_as_unavailable() {
    let service = Arc::new(FakeLookupService::default());
    let (status, body) =
        send_json(create_app(service, true), post_json(r#"{"name":"store-down"}"#)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Service unavailable");
    assert_has_timing(&body);
}

#[tokio::test]
async fn test_index_page() {
    let app = create_app(Arc::new(FakeLookupService::default()), false);
    let response = app.oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("/api/search"));
}

#[tokio::test]
async fn test_health() {
    let app = create_app(Arc::new(FakeLookupService::default()), false);
    let (status, body) = send_json(app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_when_all_checks_pass() {
    let app = create_app(Arc::new(FakeLookupService::default()), false);
    let (status, body) = send_json(app, get("/ready")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn test_not_ready_when_store_unhealthy() {
    let state = AppState::new(
        Arc::new(FakeLookupService::default()),
        vec![
            health("cache", HealthStatus::Degraded("cache disabled".to_string())),
            health("database", HealthStatus::Unhealthy("refused".to_string())),
        ],
    );
    let app = build_router(state, &ServerConfig::default());
    let (status, body) = send_json(app, get("/ready")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "not_ready");
    assert_eq!(body["checks"]["cache"]["status"], "degraded");
    assert_eq!(body["checks"]["database"]["detail"], "refused");
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let app = create_app(Arc::new(FakeLookupService::default()), false);
    let response = app.oneshot(get("/health")).await.unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
