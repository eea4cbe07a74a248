//! Construction of the transaction payload Paradise expects.
//!
//! Pure transforms only; every optional customer/address field gets a safe
//! default so the payload always validates upstream. Depending on whether
//! an offer was obtained, the cart either references the offer or carries
//! the real line items (with no offer fields at all).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::money::{only_digits, CartLine};
use crate::pricing::Order;

use super::OfferOutcome;

const BRAZIL_COUNTRY_CODE: &str = "55";

// Antifraud requires a complete address; orders without one get the
// store's own.
const FALLBACK_ZIP: &str = "01311000";
const FALLBACK_STREET: &str = "Av. Paulista";
const FALLBACK_NUMBER: &str = "1000";
const FALLBACK_NEIGHBORHOOD: &str = "Bela Vista";
const FALLBACK_CITY: &str = "São Paulo";
const FALLBACK_STATE: &str = "SP";
const FALLBACK_PHONE: &str = "5511999999999";

/// Customer as sent by the storefront.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// CPF/CNPJ, any formatting.
    #[serde(default, alias = "taxId", alias = "tax_id")]
    pub document: Option<String>,
    /// E.g. "+55 (11) 99999-9999" or "5511999999999".
    #[serde(default)]
    pub phone: Option<String>,
}

/// Optional shipping address; only used to enrich the customer record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressInput {
    #[serde(default, alias = "line1", alias = "street")]
    pub street_name: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub complement: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, alias = "zip", alias = "zip_code")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

/// Customer record in the exact shape Paradise validates.
#[derive(Debug, Clone, Serialize)]
pub struct ParadiseCustomer {
    pub name: String,
    pub email: String,
    pub document: String,
    pub phone_number: String,
    pub phone_country_code: String,
    pub zip_code: String,
    pub street_name: String,
    pub number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_hash: Option<String>,
    pub title: String,
    pub price: i64,
    pub unit_price: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionPayload {
    pub payment_method: &'static str,
    pub amount: i64,
    pub installments: u8,
    pub product_hash: String,
    pub quantity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer_hash: Option<String>,
    pub cart: Vec<CartEntry>,
    pub customer: ParadiseCustomer,
    pub metadata: Map<String, Value>,
    pub postback_url: String,
}

/// Splits a phone into country code and full digits. Numbers already
/// prefixed with 55 pass through; everything else gets the prefix.
pub fn parse_phone(full: &str) -> (String, String) {
    let digits = only_digits(full);
    if digits.is_empty() {
        return (
            BRAZIL_COUNTRY_CODE.to_string(),
            FALLBACK_PHONE.to_string(),
        );
    }
    let number = if digits.starts_with(BRAZIL_COUNTRY_CODE) {
        digits
    } else {
        format!("{}{}", BRAZIL_COUNTRY_CODE, digits)
    };
    (BRAZIL_COUNTRY_CODE.to_string(), number)
}

/// Builds the Paradise customer from client input, applying the fallback
/// address for any missing field and digits-only normalization to phone,
/// document and postal code.
pub fn build_customer(customer: &CustomerInput, address: Option<&AddressInput>) -> ParadiseCustomer {
    let (phone_country_code, phone_number) =
        parse_phone(customer.phone.as_deref().unwrap_or_default());
    let addr = address.cloned().unwrap_or_default();

    let zip = addr
        .postal_code
        .as_deref()
        .map(only_digits)
        .filter(|z| !z.is_empty())
        .unwrap_or_else(|| FALLBACK_ZIP.to_string());

    ParadiseCustomer {
        name: customer.name.trim().to_string(),
        email: customer.email.trim().to_string(),
        document: customer
            .document
            .as_deref()
            .map(only_digits)
            .unwrap_or_default(),
        phone_number,
        phone_country_code,
        zip_code: zip,
        street_name: non_empty_or(addr.street_name, FALLBACK_STREET),
        number: non_empty_or(addr.number, FALLBACK_NUMBER),
        complement: addr.complement.unwrap_or_default(),
        neighborhood: non_empty_or(addr.neighborhood, FALLBACK_NEIGHBORHOOD),
        city: non_empty_or(addr.city, FALLBACK_CITY),
        state: non_empty_or(addr.state, FALLBACK_STATE),
        country: addr
            .country
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| "br".to_string())
            .to_lowercase(),
    }
}

/// Assembles the create-transaction payload.
///
/// With an offer in hand the cart carries a single entry referencing it,
/// priced at the order total. Without one, the cart carries the real
/// normalized items and no offer fields; the amount alone prices the
/// transaction.
pub fn build_transaction_payload(
    order: &Order,
    customer: ParadiseCustomer,
    client_metadata: Option<Map<String, Value>>,
    offer: &OfferOutcome,
    product_hash: &str,
    postback_url: &str,
) -> TransactionPayload {
    let cart = match offer {
        OfferOutcome::Obtained(hash) => vec![CartEntry {
            product_hash: Some(product_hash.to_string()),
            offer_hash: Some(hash.clone()),
            title: order.title(),
            price: order.total_cents,
            unit_price: order.total_cents,
            quantity: 1,
        }],
        OfferOutcome::Unavailable => order.items.iter().map(line_entry).collect(),
    };

    let mut metadata = client_metadata.unwrap_or_default();
    metadata
        .entry("origin".to_string())
        .or_insert_with(|| Value::String("storefront".to_string()));
    metadata.insert(
        "order_id".to_string(),
        Value::String(order.order_id.clone()),
    );
    // Transaction creation is never retried (duplicate-charge risk); the
    // key lets the upstream dedupe if our request does race a timeout.
    metadata.insert(
        "idempotency_key".to_string(),
        Value::String(uuid::Uuid::new_v4().to_string()),
    );

    TransactionPayload {
        payment_method: "pix",
        amount: order.total_cents,
        installments: 1,
        product_hash: product_hash.to_string(),
        quantity: 1,
        offer_hash: offer.hash().map(str::to_string),
        cart,
        customer,
        metadata,
        postback_url: postback_url.to_string(),
    }
}

fn line_entry(line: &CartLine) -> CartEntry {
    CartEntry {
        product_hash: None,
        offer_hash: None,
        title: line.name.clone(),
        price: line.unit_price_cents,
        unit_price: line.unit_price_cents,
        quantity: line.quantity,
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}
