//! Tests for the ViaCEP proxy used to prefill the address form.

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

mod common;
use common::*;

#[tokio::test]
async fn known_zip_is_normalized() {
    let stub = Router::new().route(
        "/{zip}/json/",
        get(|| async {
            Json(json!({
                "logradouro": "Avenida Paulista",
                "bairro": "Bela Vista",
                "localidade": "São Paulo",
                "uf": "SP"
            }))
        }),
    );
    let base = spawn_upstream(stub).await;

    // Formatting in the path is stripped before the upstream call.
    let (status, body) = common::get(test_app(&base), "/cep/01310-100").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["zip"], "01310100");
    assert_eq!(body["street"], "Avenida Paulista");
    assert_eq!(body["city"], "São Paulo");
    assert_eq!(body["state"], "SP");
}

#[tokio::test]
async fn unknown_zip_is_not_found() {
    let stub = Router::new().route(
        "/{zip}/json/",
        get(|| async { Json(json!({"erro": true})) }),
    );
    let base = spawn_upstream(stub).await;

    let (status, body) = common::get(test_app(&base), "/cep/99999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn short_zip_is_rejected_locally() {
    let (status, body) = common::get(test_app("http://127.0.0.1:9"), "/cep/123").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
}

#[tokio::test]
async fn health_reports_version() {
    let (status, body) = common::get(test_app("http://127.0.0.1:9"), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
