use axum::{extract::{Path, Query, State}, http::{HeaderValue, StatusCode}, routing::get, Json, Router};
use search_core::{DocId, SearchHit, SearchIndex, DEFAULT_TOP_N};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Upper bound on `k` for a single request.
pub const MAX_K: usize = 100;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { DEFAULT_TOP_N }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub num_docs: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct DocResponse {
    pub doc_id: DocId,
    pub name: String,
    pub magnitude: f64,
}

/// The index is built before the server starts and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<SearchIndex>,
}

pub fn build_app(index: SearchIndex) -> Router {
    let cors = cors_layer(std::env::var("CORS_ALLOW_ORIGIN").ok().as_deref());
    let state = AppState { index: Arc::new(index) };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Comma-separated origins, or any origin when unset or nothing parses.
fn cors_layer(allow_origin: Option<&str>) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    let origins: Vec<HeaderValue> = allow_origin
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "*")
        .filter_map(|s| s.parse().ok())
        .collect();
    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(AllowOrigin::list(origins))
    }
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let k = params.k.min(MAX_K);
    let results = state.index.search(&params.q, k);
    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, k, hits = results.len(), "search served");
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), num_docs: state.index.num_docs(), results })
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<DocResponse>, StatusCode> {
    let meta = state.index.doc(doc_id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(DocResponse { doc_id, name: meta.name.clone(), magnitude: meta.magnitude }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    async fn preflight(allow_origin: Option<&str>, origin: &str) -> Option<String> {
        let app: Router = Router::new().route("/search", get(|| async { "ok" })).layer(cors_layer(allow_origin));
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/search")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn unset_or_empty_origin_list_allows_any() {
        assert_eq!(preflight(None, "https://a.example").await.as_deref(), Some("*"));
        assert_eq!(preflight(Some(" , "), "https://a.example").await.as_deref(), Some("*"));
        assert_eq!(preflight(Some("*"), "https://a.example").await.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn listed_origins_are_echoed_and_others_refused() {
        let allow = Some("https://a.example, https://b.example");
        assert_eq!(preflight(allow, "https://b.example").await.as_deref(), Some("https://b.example"));
        assert_eq!(preflight(allow, "https://evil.example").await, None);
    }
}
