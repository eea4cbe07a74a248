use axum::body::Bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::Value;

use crate::gateway::normalize_transaction;

/// Paradise pushes payment-status updates here. The response is 200 no
/// matter what: the sender's retries are not idempotency-safe on our
/// side, so a local processing problem must never look like delivery
/// failure to the gateway.
pub async fn handle_paradise_webhook(body: Bytes) -> impl IntoResponse {
    match serde_json::from_slice::<Value>(&body) {
        Ok(event) => {
            let tx = normalize_transaction(&event);
            if tx.status.is_paid() {
                tracing::info!(
                    tx_hash = tx.tx_hash.as_deref().unwrap_or("-"),
                    "webhook: payment confirmed"
                );
            } else {
                tracing::info!(
                    tx_hash = tx.tx_hash.as_deref().unwrap_or("-"),
                    status = %tx.status,
                    "webhook received"
                );
            }
        }
        Err(err) => {
            tracing::warn!(%err, "webhook body was not JSON, acknowledging anyway");
        }
    }
    (StatusCode::OK, "ok")
}
