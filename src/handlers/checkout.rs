use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::gateway::{
    build_customer, build_transaction_payload, normalize_transaction, AddressInput, CustomerInput,
    OfferOutcome, PixCode,
};
use crate::money::{normalize_cart, RawCartLine, RawPrice};
use crate::pricing::Order;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<RawCartLine>,
    pub customer: CustomerInput,
    #[serde(default)]
    pub shipping: Option<ShippingInput>,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// Shipping block from the storefront. The price is ignored (the
/// surcharge rule is applied server-side so the charged amount always
/// matches what the cart showed); the address enriches the customer.
#[derive(Debug, Default, Deserialize)]
pub struct ShippingInput {
    #[serde(default)]
    pub price: Option<RawPrice>,
    #[serde(default)]
    pub address: Option<AddressInput>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub ok: bool,
    pub tx_id: Option<String>,
    pub tx_hash: Option<String>,
    pub pix: PixCode,
    /// Raw gateway response, for the storefront's own fallbacks.
    pub raw: Value,
}

pub async fn create_checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    if request.items.is_empty() {
        return Err(AppError::Validation("items must not be empty".into()));
    }
    if request.customer.name.trim().is_empty() {
        return Err(AppError::Validation("customer.name is required".into()));
    }
    if request.customer.email.trim().is_empty() {
        return Err(AppError::Validation("customer.email is required".into()));
    }

    let lines = normalize_cart(&request.items);
    // A line that normalized to zero would silently vanish from the total;
    // refuse the cart instead of undercharging.
    if let Some(bad) = lines.iter().find(|l| l.unit_price_cents <= 0) {
        return Err(AppError::Validation(format!(
            "item '{}' has no parsable price",
            bad.id
        )));
    }

    let order = Order::price(lines, &state.config.pricing)?;
    tracing::info!(
        order_id = %order.order_id,
        subtotal = order.subtotal_cents,
        surcharge = order.surcharge_cents,
        total = order.total_cents,
        "order priced"
    );

    // Reuse a live offer for this exact amount when we have one.
    let offer = match state.offer_cache.get(order.total_cents) {
        Some(hash) => OfferOutcome::Obtained(hash),
        None => {
            let outcome = state
                .gateway
                .create_offer(order.total_cents, &order.title())
                .await;
            if let OfferOutcome::Obtained(hash) = &outcome {
                state.offer_cache.put(order.total_cents, hash.clone());
            }
            outcome
        }
    };

    let customer = build_customer(
        &request.customer,
        request
            .shipping
            .as_ref()
            .and_then(|s| s.address.as_ref()),
    );
    let payload = build_transaction_payload(
        &order,
        customer,
        request.metadata,
        &offer,
        &state.config.paradise_product_hash,
        &state.config.postback_url,
    );

    let raw = state.gateway.create_transaction(&payload).await?;
    let tx = normalize_transaction(&raw);

    Ok(Json(CheckoutResponse {
        ok: true,
        tx_id: tx.tx_id,
        tx_hash: tx.tx_hash,
        pix: tx.pix.unwrap_or(PixCode {
            brcode: None,
            qr_code_base64: None,
        }),
        raw,
    }))
}
