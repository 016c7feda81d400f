#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use gemchain_core::context::InvocationContext;
use gemchain_core::dispatch::Dispatcher;
use gemchain_core::engine::EngineConfig;
use gemchain_core::store::MemoryStore;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use gemchain_api::auth::jwt::{generate_access_token, JwtConfig};
use gemchain_api::config::ServerConfig;
use gemchain_api::routes;
use gemchain_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        engine: EngineConfig::default(),
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub async fn build_test_app() -> Router {
    let config = test_config();
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(MemoryStore::new()),
        config.engine,
    ));
    dispatcher
        .initialize(&InvocationContext::detached("init"))
        .await
        .unwrap();

    let state = AppState {
        dispatcher,
        config: Arc::new(config),
        pool: None,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Bearer token for `principal` acting as `role`.
pub fn token(principal: &str, role: &str) -> String {
    generate_access_token(principal, role, &test_config().jwt).unwrap()
}

/// POST a `{"function", "args"}` body to `uri` with an optional bearer token.
pub async fn call(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    function: &str,
    args: &[&str],
) -> Response<Body> {
    let body = serde_json::json!({ "function": function, "args": args });
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn invoke(app: &Router, token: &str, function: &str, args: &[&str]) -> Response<Body> {
    call(app, "/api/v1/invoke", Some(token), function, args).await
}

pub async fn query(app: &Router, token: &str, function: &str, args: &[&str]) -> Response<Body> {
    call(app, "/api/v1/query", Some(token), function, args).await
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
