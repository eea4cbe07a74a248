mod cep;
mod checkout;
mod tx;
mod webhooks;

pub use cep::*;
pub use checkout::*;
pub use tx::*;
pub use webhooks::*;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/checkout", post(create_checkout))
        .route("/tx/{id_or_hash}", get(get_transaction))
        .route("/webhooks/paradise", post(handle_paradise_webhook))
        .route("/cep/{zip}", get(lookup_cep))
}

/// The storefront modal calls this API cross-origin; without an
/// allowlist configured, any origin is accepted.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok()),
        )
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

/// Fully wired application: routes, state, CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);
    router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
