//! User search controller.

use crate::{
    responses::{ResponseTimer, SearchReply, SearchResponse, INVALID_REQUEST_BODY},
    state::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;
use usercache_core::rules::not_blank;
use utoipa::ToSchema;

/// Search request body.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SearchRequest {
    /// Name to look up. Surrounding whitespace is ignored.
    #[serde(default)]
    pub name: Option<String>,
}

/// Creates the search router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(search_user))
        .route("/:name", get(search_user_by_path))
}

/// Look up a user by name from a JSON body.
#[utoipa::path(
    post,
    path = "/api/search",
    tag = "search",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "User found", body = SearchResponse),
        (status = 400, description = "Name missing or body invalid", body = SearchResponse),
        (status = 404, description = "User not found", body = SearchResponse),
        (status = 503, description = "Backing store unavailable", body = SearchResponse)
    )
)]
pub async fn search_user(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> SearchReply {
    let timer = ResponseTimer::start();

    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!("Rejected search body: {}", rejection);
            return SearchReply::failure(StatusCode::BAD_REQUEST, INVALID_REQUEST_BODY, timer);
        }
    };

    let name = request.name.as_deref().unwrap_or_default().trim();
    if name.is_empty() {
        return SearchReply::name_required(timer);
    }

    debug!("Search request: {}", name);
    let result = state.lookup_service.lookup(name).await;
    SearchReply::from_result(result, timer, state.expose_infrastructure_errors)
}

/// Look up a user by name from the path.
///
/// The segment is used as given; it is only checked for being non-blank.
#[utoipa::path(
    get,
    path = "/api/search/{name}",
    tag = "search",
    params(("name" = String, Path, description = "Name to look up")),
    responses(
        (status = 200, description = "User found", body = SearchResponse),
        (status = 400, description = "Name blank", body = SearchResponse),
        (status = 404, description = "User not found", body = SearchResponse),
        (status = 503, description = "Backing store unavailable", body = SearchResponse)
    )
)]
pub async fn search_user_by_path(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> SearchReply {
    let timer = ResponseTimer::start();

    if !not_blank(&name) {
        return SearchReply::name_required(timer);
    }

    debug!("Search request: {}", name);
    let result = state.lookup_service.lookup(&name).await;
    SearchReply::from_result(result, timer, state.expose_infrastructure_errors)
}
