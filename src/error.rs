use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Client sent something we refuse to forward (empty cart, missing
    /// customer fields, unparsable body).
    #[error("{0}")]
    Validation(String),

    /// Order total is under the gateway's minimum transaction amount.
    #[error("order total {amount} is below the minimum of {minimum}")]
    BelowMinimum { amount: i64, minimum: i64 },

    #[error("{0}")]
    NotFound(String),

    /// Upstream gateway returned a non-2xx status or an unparsable body.
    #[error("gateway error ({status}): {detail}")]
    Gateway { status: u16, detail: serde_json::Value },

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BelowMinimum { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            // Mirror the upstream status when it is a sensible HTTP error,
            // otherwise report a bad gateway.
            AppError::Gateway { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::BelowMinimum { .. } => "min_amount",
            AppError::NotFound(_) => "not_found",
            AppError::Gateway { .. } => "gateway",
            AppError::Internal(_) => "internal",
        }
    }
}

// Every error leaves the service as a JSON body; the storefront modal
// parses whatever it receives, so HTML error pages are never acceptable.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = match &self {
            AppError::Gateway { detail, .. } => detail.clone(),
            other => json!({ "message": other.to_string() }),
        };
        let body = json!({
            "ok": false,
            "error": self.error_code(),
            "detail": detail,
        });
        (status, Json(body)).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Internal(format!("upstream request failed: {}", err))
    }
}
