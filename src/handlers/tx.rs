use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::gateway::{normalize_transaction, PaymentStatus, PixCode};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TransactionStatusResponse {
    pub status: PaymentStatus,
    pub pix: Option<PixCode>,
    pub raw: Value,
}

/// Status endpoint the storefront polls while the PIX modal is open.
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id_or_hash): Path<String>,
) -> Result<Json<TransactionStatusResponse>> {
    let raw = state.gateway.lookup_transaction(&id_or_hash).await?;
    let tx = normalize_transaction(&raw);

    Ok(Json(TransactionStatusResponse {
        status: tx.status,
        pix: tx.pix,
        raw,
    }))
}
