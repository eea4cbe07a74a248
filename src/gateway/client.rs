use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::{AppError, Result};

use super::normalize::extract_offer_hash;
use super::payload::TransactionPayload;
use super::OfferOutcome;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP client for the Paradise public API. Authentication is an
/// `api_token` query parameter on every call.
#[derive(Debug, Clone)]
pub struct ParadiseClient {
    http: Client,
    base_url: String,
    api_token: String,
    product_hash: String,
}

impl ParadiseClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: config.paradise_base_url.clone(),
            api_token: config.paradise_api_token.clone(),
            product_hash: config.paradise_product_hash.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        let sep = if path.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}api_token={}",
            self.base_url,
            path,
            sep,
            urlencoding::encode(&self.api_token)
        )
    }

    /// Creates a dynamic offer for the amount under the anchor product.
    ///
    /// Offer creation gets one immediate retry; after that the checkout
    /// proceeds on the amount+cart path, so failures here are logged and
    /// absorbed rather than surfaced.
    pub async fn create_offer(&self, amount_cents: i64, title: &str) -> OfferOutcome {
        for attempt in 1..=2u8 {
            match self.try_create_offer(amount_cents, title).await {
                Ok(hash) => {
                    tracing::info!(amount_cents, %hash, "offer created");
                    return OfferOutcome::Obtained(hash);
                }
                Err(err) => {
                    tracing::warn!(amount_cents, attempt, %err, "offer creation failed");
                }
            }
        }
        tracing::warn!(amount_cents, "proceeding without offer_hash");
        OfferOutcome::Unavailable
    }

    async fn try_create_offer(&self, amount_cents: i64, title: &str) -> Result<String> {
        let path = format!("/products/{}/offers", self.product_hash);
        // Clusters disagree on the price field name; send all three.
        let body = json!({
            "title": title,
            "price": amount_cents,
            "amount": amount_cents,
            "unit_price": amount_cents,
        });

        let response = self.http.post(self.url(&path)).json(&body).send().await?;
        let status = response.status();
        let resp: Value = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("offer response unparsable: {}", e)))?;

        if !status.is_success() {
            return Err(AppError::Gateway {
                status: status.as_u16(),
                detail: resp,
            });
        }

        extract_offer_hash(&resp)
            .ok_or_else(|| AppError::Internal("offer response carried no hash".into()))
    }

    /// Creates the PIX transaction. Never retried: a duplicate request
    /// here is a duplicate charge.
    pub async fn create_transaction(&self, payload: &TransactionPayload) -> Result<Value> {
        tracing::info!(
            amount = payload.amount,
            cart_len = payload.cart.len(),
            offer = payload.offer_hash.as_deref().unwrap_or("-"),
            "creating pix transaction"
        );

        let response = self
            .http
            .post(self.url("/transactions"))
            .json(payload)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        let resp = parse_or_wrap(&body);

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "transaction creation refused");
            return Err(AppError::Gateway {
                status: status.as_u16(),
                detail: resp,
            });
        }
        Ok(resp)
    }

    /// Looks a transaction up by id or hash, trying every URL variant the
    /// gateway has answered on. Transient failures on one variant fall
    /// through to the next; only a 401 stops the scan early.
    pub async fn lookup_transaction(&self, id_or_hash: &str) -> Result<Value> {
        let encoded = urlencoding::encode(id_or_hash).into_owned();
        let is_numeric = !id_or_hash.is_empty() && id_or_hash.bytes().all(|b| b.is_ascii_digit());

        let mut paths = Vec::new();
        if is_numeric {
            paths.push(format!("/transactions/id/{}", encoded));
        }
        paths.push(format!("/transactions/{}", encoded));
        paths.push(format!("/transactions/hash/{}", encoded));
        paths.push(format!("/transactions?transaction_hash={}", encoded));
        paths.push(format!("/transactions?id={}", encoded));

        for path in &paths {
            let response = match self.http.get(self.url(path)).send().await {
                Ok(r) => r,
                Err(err) => {
                    tracing::debug!(%path, %err, "lookup variant transport error");
                    continue;
                }
            };
            match response.status() {
                StatusCode::UNAUTHORIZED => {
                    return Err(AppError::Gateway {
                        status: 401,
                        detail: json!({ "message": "unauthenticated" }),
                    });
                }
                status if status.is_success() => match response.json::<Value>().await {
                    Ok(body) => return Ok(body),
                    Err(err) => {
                        tracing::debug!(%path, %err, "lookup variant unparsable");
                        continue;
                    }
                },
                status => {
                    tracing::debug!(%path, status = status.as_u16(), "lookup variant miss");
                    continue;
                }
            }
        }

        Err(AppError::NotFound(format!(
            "transaction {} not found (try the tx_hash)",
            id_or_hash
        )))
    }
}

/// Upstream sometimes answers errors with HTML; keep the raw text so the
/// client still receives JSON.
fn parse_or_wrap(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| json!({ "message": body }))
}
