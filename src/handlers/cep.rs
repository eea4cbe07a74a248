use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::money::only_digits;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    erro: bool,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
}

#[derive(Debug, Serialize)]
pub struct CepResponse {
    pub zip: String,
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

/// ViaCEP proxy used by the address form. Prefill only; the checkout
/// payload never depends on this answering.
pub async fn lookup_cep(
    State(state): State<AppState>,
    Path(zip): Path<String>,
) -> Result<Json<CepResponse>> {
    let zip = only_digits(&zip);
    if zip.len() != 8 {
        return Err(AppError::Validation("zip must be 8 digits".into()));
    }

    let url = format!("{}/{}/json/", state.config.viacep_base_url, zip);
    let response = state.http.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(AppError::Internal(format!(
            "cep lookup failed with status {}",
            response.status()
        )));
    }

    let data: ViaCepResponse = response
        .json()
        .await
        .map_err(|e| AppError::Internal(format!("cep response unparsable: {}", e)))?;
    if data.erro {
        return Err(AppError::NotFound(format!("zip {} not found", zip)));
    }

    Ok(Json(CepResponse {
        zip,
        street: data.logradouro,
        neighborhood: data.bairro,
        city: data.localidade,
        state: data.uf,
    }))
}
