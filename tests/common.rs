//! Shared test fixtures: application state wired to an in-process stub
//! standing in for the Paradise gateway (and ViaCEP).
#![allow(dead_code)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use pix_checkout::config::Config;
use pix_checkout::handlers;
use pix_checkout::pricing::PricingRule;
use pix_checkout::state::AppState;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Config pointing every upstream at the stub.
pub fn test_config(upstream_base: &str) -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0,
        paradise_base_url: upstream_base.trim_end_matches('/').to_string(),
        paradise_api_token: "test-token".into(),
        paradise_product_hash: "prod_anchor".into(),
        postback_url: "http://localhost/webhooks/paradise".into(),
        viacep_base_url: upstream_base.trim_end_matches('/').to_string(),
        pricing: PricingRule::default(),
        offer_cache_ttl: Duration::from_secs(600),
        allowed_origins: Vec::new(),
    }
}

pub fn test_app(upstream_base: &str) -> Router {
    let state = AppState::new(test_config(upstream_base)).unwrap();
    handlers::app(state)
}

pub async fn post_json(app: Router, path: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_response(response).await
}

pub async fn post_raw(app: Router, path: &str, body: &'static str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    read_response(response).await
}

pub async fn get(app: Router, path: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(path)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    read_response(response).await
}

async fn read_response(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
