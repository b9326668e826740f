//! HTTP adapter over the search engine.
//!
//! JSON and HTML routes share one engine; rate limiting runs as middleware
//! ahead of every handler.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, Query, State},
    http::{HeaderMap, Request, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::engine::OsintEngine;
use crate::output;
use crate::ratelimit::{RateLimits, RouteClass};
use crate::types::{OsintError, SearchReport};

const USER_HEADER: &str = "x-user-id";

/// Shared state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<OsintEngine>,
    pub limits: Arc<RateLimits>,
    pub development: bool,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: OsintEngine) -> Result<Self, OsintError> {
        let limits = RateLimits::new(&engine.config().server)?;
        let development = engine.config().server.development;
        Ok(Self {
            engine: Arc::new(engine),
            limits: Arc::new(limits),
            development,
            start_time: Instant::now(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(rename = "type")]
    pub query_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub query_type: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub build_time: &'static str,
    pub git_hash: &'static str,
    pub uptime_seconds: u64,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// JSON error response, with internals hidden outside development mode.
pub struct ApiError {
    error: OsintError,
    development: bool,
}

impl ApiError {
    fn new(error: OsintError, development: bool) -> Self {
        Self { error, development }
    }

    fn status(&self) -> StatusCode {
        status_for(&self.error)
    }
}

fn status_for(error: &OsintError) -> StatusCode {
    match error {
        OsintError::ValidationError(_) => StatusCode::BAD_REQUEST,
        OsintError::RateLimitError(_) => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn public_message(error: &OsintError, development: bool) -> String {
    match status_for(error) {
        StatusCode::INTERNAL_SERVER_ERROR if !development => "Internal server error".to_string(),
        _ => error.to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {}", self.error);
        }
        let body = ErrorBody {
            error: public_message(&self.error, self.development),
        };
        (status, Json(body)).into_response()
    }
}

/// Best guess at the caller: socket peer, then the first forwarded hop.
fn client_ip<B>(request: &Request<B>) -> IpAddr {
    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip();
    }
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let class = RouteClass::for_path(request.uri().path());
    let ip = client_ip(&request);

    if let Err(e) = state.limits.check(class, ip) {
        warn!("Rate limit hit for {} on {}", ip, request.uri().path());
        return ApiError::new(e, state.development).into_response();
    }

    next.run(request).await
}

/// Creates the HTTP router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/search", get(search_html_handler).post(search_json_handler))
        .route("/api/search", post(search_json_handler))
        .route("/api/history", get(history_handler))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .with_state(state)
}

fn user_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

async fn index_handler() -> Html<String> {
    Html(output::render_index())
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        build_time: env!("BUILD_TIME"),
        git_hash: env!("GIT_HASH"),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

async fn search_json_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchReport>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::new(
            OsintError::ValidationError(rejection.body_text()),
            state.development,
        )
    })?;

    let user = user_id(&headers);
    state
        .engine
        .search(&request.query, request.query_type.as_deref(), user.as_deref())
        .await
        .map(Json)
        .map_err(|e| ApiError::new(e, state.development))
}

async fn search_html_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let Some(query) = params.q.filter(|q| !q.trim().is_empty()) else {
        return Html(output::render_index()).into_response();
    };

    let user = user_id(&headers);
    match state
        .engine
        .search(&query, params.query_type.as_deref(), user.as_deref())
        .await
    {
        Ok(report) => Html(output::render_html(&report)).into_response(),
        Err(e) => {
            let status = status_for(&e);
            (status, Html(output::render_error_html(&public_message(&e, state.development)))).into_response()
        }
    }
}

async fn history_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<SearchReport>>, ApiError> {
    let user = user_id(&headers).ok_or_else(|| {
        ApiError::new(
            OsintError::ValidationError(format!("Missing {} header", USER_HEADER)),
            state.development,
        )
    })?;
    Ok(Json(state.engine.history(&user)))
}

/// Bind and serve until the process is stopped.
pub async fn serve(engine: OsintEngine, bind: &str) -> Result<(), OsintError> {
    let state = AppState::new(engine)?;

    // Keyed limiter state would otherwise grow with every client ever seen
    let limits = state.limits.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            limits.prune();
        }
    });

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| OsintError::ConfigError(format!("Failed to bind {}: {}", bind, e)))?;
    info!("Listening on http://{}", bind);

    axum::serve(
        listener,
        create_router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| OsintError::NetworkError(format!("Server error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::{engine_with, offline_config};
    use crate::resolver::testing::StaticDns;
    use axum::body::Body;
    use axum::http::header;
    use tower::ServiceExt;

    fn create_test_state(search_per_minute: u32) -> AppState {
        let mut config = offline_config();
        config.server.search_per_minute = search_per_minute;
        AppState::new(engine_with(config, StaticDns::new())).unwrap()
    }

    fn post_search(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/search")
            .header(header::CONTENT_TYPE, "application/json")
            .header(USER_HEADER, "alice")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_router(create_test_state(10));
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_json_search() {
        let app = create_router(create_test_state(10));
        let response = app
            .oneshot(post_search(r#"{"query":"1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["type"], "crypto");
        assert_eq!(json["query"], "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa");
        assert_eq!(json["results"][0]["platform"], "Address Format");
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_invalid_input_is_400() {
        let state = create_test_state(10);
        let app = create_router(state.clone());

        let response = app.clone().oneshot(post_search(r#"{"query":"<script>"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].as_str().unwrap().contains("forbidden"));

        let response = app.clone().oneshot(post_search("not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(post_search(r#"{"query":"johndoe","type":"fax"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(state.engine.history("alice").is_empty());
    }

    #[tokio::test]
    async fn test_search_rate_limit_is_429() {
        let app = create_router(create_test_state(1));

        let first = app.clone().oneshot(post_search(r#"{"query":"+15551234567"}"#)).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app.clone().oneshot(post_search(r#"{"query":"+15551234567"}"#)).await.unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);

        let health = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_html_search_and_history() {
        let state = create_test_state(10);
        let app = create_router(state.clone());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/search?q=%2B447911123456")
                    .header(USER_HEADER, "bob")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("United Kingdom"));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/history")
                    .header(USER_HEADER, "bob")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.as_array().map(|a| a.len()), Some(1));
        assert_eq!(json[0]["type"], "phone");

        let response = app
            .oneshot(Request::builder().uri("/api/history").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_html_search_rejects_markup() {
        let app = create_router(create_test_state(10));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/search?q=%3Cscript%3E")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_text(response).await;
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_internal_errors_are_redacted() {
        let err = OsintError::NetworkError("resolver at 10.1.2.3 down".to_string());
        assert_eq!(public_message(&err, false), "Internal server error");
        assert!(public_message(&err, true).contains("10.1.2.3"));

        let err = OsintError::ValidationError("Query must not be empty".to_string());
        assert_eq!(public_message(&err, false), "Invalid input: Query must not be empty");
    }

    #[test]
    fn test_client_ip_from_forwarded_header() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(())
            .unwrap();
        assert_eq!(client_ip(&request), "203.0.113.7".parse::<IpAddr>().unwrap());

        let request = Request::builder().body(()).unwrap();
        assert_eq!(client_ip(&request), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }
}
