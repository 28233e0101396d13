use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use coupons_api::config::{CouponSettings, ServerConfig};
use coupons_api::router::build_app_router;
use coupons_api::state::AppState;
use coupons_core::hooks::CouponHooks;
use coupons_events::EventBus;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(coupons: CouponSettings) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        coupons,
    }
}

/// Build the application router with default coupon settings.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, CouponSettings::default(), CouponHooks::default()).0
}

/// Build the application router plus its state, so tests can subscribe to
/// the event bus or reach the store directly.
pub fn build_test_app_with(
    pool: PgPool,
    coupons: CouponSettings,
    hooks: CouponHooks,
) -> (Router, AppState) {
    let config = test_config(coupons);
    let state = AppState::with_hooks(pool, config.clone(), Arc::new(EventBus::default()), hooks);
    (build_app_router(state.clone(), &config), state)
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
