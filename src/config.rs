use std::env;
use std::time::Duration;

use anyhow::Context;

use crate::pricing::PricingRule;

pub const DEFAULT_PARADISE_BASE_URL: &str = "https://api.paradisepagbr.com/api/public/v1";
pub const DEFAULT_VIACEP_BASE_URL: &str = "https://viacep.com.br/ws";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Paradise API root, no trailing slash.
    pub paradise_base_url: String,
    pub paradise_api_token: String,
    /// Anchor product the dynamic offers hang off of.
    pub paradise_product_hash: String,
    /// Where Paradise pushes payment-status updates.
    pub postback_url: String,
    pub viacep_base_url: String,
    pub pricing: PricingRule,
    pub offer_cache_ttl: Duration,
    /// Origins allowed to call the API from a browser.
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Loads configuration from the environment. Gateway credentials are
    /// required; a missing token surfaces here at startup instead of as an
    /// opaque 401 on the first checkout.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let paradise_api_token =
            env::var("PARADISE_API_TOKEN").context("PARADISE_API_TOKEN is not set")?;
        let paradise_product_hash =
            env::var("PARADISE_PRODUCT_HASH").context("PARADISE_PRODUCT_HASH is not set")?;

        let paradise_base_url = env::var("PARADISE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_PARADISE_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let postback_url = env::var("POSTBACK_URL").unwrap_or_else(|_| {
            let public = env::var("PUBLIC_URL").unwrap_or_default();
            format!("{}/webhooks/paradise", public.trim_end_matches('/'))
        });

        let viacep_base_url = env::var("VIACEP_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_VIACEP_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let pricing = PricingRule {
            free_shipping_min_qty: env_or("FREE_SHIPPING_MIN_QTY", 3),
            shipping_fee_cents: env_or("SHIPPING_FEE_CENTS", 1500),
            min_transaction_cents: env_or("MIN_TRANSACTION_CENTS", 500),
        };

        let offer_cache_ttl = Duration::from_secs(env_or::<u64>("OFFER_CACHE_TTL_SECS", 600));

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            paradise_base_url,
            paradise_api_token,
            paradise_product_hash,
            postback_url,
            viacep_base_url,
            pricing,
            offer_cache_ttl,
            allowed_origins,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
