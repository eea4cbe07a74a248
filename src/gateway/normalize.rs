//! Extraction of stable fields from the gateway's inconsistent responses.
//!
//! Paradise clusters disagree on where they put the offer hash, the
//! transaction identifiers and the PIX fields. Each field is resolved
//! through an ordered list of candidate key paths; the first present,
//! non-null value wins.

use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use super::PaymentStatus;

/// The PIX payment artifacts the storefront renders: the copy-paste
/// "copia e cola" code and/or the pre-rendered QR image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PixCode {
    pub brcode: Option<String>,
    pub qr_code_base64: Option<String>,
}

/// Stable view of a gateway transaction, whatever shape it arrived in.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedTransaction {
    pub tx_id: Option<String>,
    pub tx_hash: Option<String>,
    pub status: PaymentStatus,
    pub pix: Option<PixCode>,
}

const OFFER_HASH_PATHS: &[&[&str]] = &[
    &["hash"],
    &["offer_hash"],
    &["data", "hash"],
    &["data", "offer_hash"],
    &["offer", "hash"],
    &["data", "offer", "hash"],
];

const TX_ID_PATHS: &[&[&str]] = &[&["id"], &["tx_id"], &["tx"], &["data", "id"]];

const TX_HASH_PATHS: &[&[&str]] = &[
    &["hash"],
    &["tx_hash"],
    &["transaction_hash"],
    &["data", "hash"],
    &["data", "transaction_hash"],
];

const STATUS_PATHS: &[&[&str]] = &[
    &["payment_status"],
    &["status"],
    &["data", "payment_status"],
    &["data", "status"],
];

const BRCODE_PATHS: &[&[&str]] = &[
    &["pix", "brcode"],
    &["pix", "pix_qr_code"],
    &["pix", "copia_e_cola"],
    &["pix", "payload"],
    &["data", "pix", "brcode"],
    &["data", "pix", "pix_qr_code"],
    &["data", "pix", "copia_e_cola"],
    &["data", "pix", "payload"],
    &["brcode"],
    &["br_code"],
    &["pix_qr_code"],
];

const QR_BASE64_PATHS: &[&[&str]] = &[
    &["pix", "qr_code_base64"],
    &["data", "pix", "qr_code_base64"],
    &["qr_code_base64"],
    &["qr_code"],
];

/// Pulls the offer hash out of a create-offer response, in any of the
/// shapes observed in production.
pub fn extract_offer_hash(resp: &Value) -> Option<String> {
    pluck_string(resp, OFFER_HASH_PATHS)
}

/// Normalizes a transaction response (create or lookup) into the contract
/// the storefront polls against.
pub fn normalize_transaction(resp: &Value) -> NormalizedTransaction {
    let tx = unwrap_listing(resp);

    let status = pluck_string(tx, STATUS_PATHS)
        .map(|s| PaymentStatus::from_str(&s).unwrap_or(PaymentStatus::Other(s)))
        .unwrap_or(PaymentStatus::Pending);

    let brcode = pluck_string(tx, BRCODE_PATHS);
    let qr_code_base64 = pluck_string(tx, QR_BASE64_PATHS);
    let pix = if brcode.is_some() || qr_code_base64.is_some() {
        Some(PixCode {
            brcode,
            qr_code_base64,
        })
    } else {
        None
    };

    NormalizedTransaction {
        tx_id: pluck_string(tx, TX_ID_PATHS),
        tx_hash: pluck_string(tx, TX_HASH_PATHS),
        status,
        pix,
    }
}

/// Listing endpoints wrap the transaction in `data: [...]`; unwrap to the
/// first element so the same candidate paths apply.
fn unwrap_listing(resp: &Value) -> &Value {
    match resp.get("data") {
        Some(Value::Array(items)) => items.first().unwrap_or(resp),
        _ => resp,
    }
}

/// First present, non-null value among the candidate paths, stringified.
/// Numeric ids come back as JSON numbers on some clusters.
fn pluck_string(value: &Value, paths: &[&[&str]]) -> Option<String> {
    paths.iter().find_map(|path| {
        let mut cursor = value;
        for key in *path {
            cursor = cursor.get(key)?;
        }
        match cursor {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    })
}
