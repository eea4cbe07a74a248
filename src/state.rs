use std::sync::Arc;

use crate::config::Config;
use crate::gateway::{InMemoryOfferCache, OfferCache, ParadiseClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: ParadiseClient,
    pub offer_cache: Arc<dyn OfferCache>,
    /// Shared client for non-gateway upstreams (ViaCEP).
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let gateway = ParadiseClient::new(&config)?;
        let offer_cache = Arc::new(InMemoryOfferCache::new(config.offer_cache_ttl));
        Ok(Self {
            config: Arc::new(config),
            gateway,
            offer_cache,
            http: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()?,
        })
    }

    /// Swaps the offer cache, e.g. for a no-op cache in tests or
    /// multi-instance deployments.
    pub fn with_offer_cache(mut self, cache: Arc<dyn OfferCache>) -> Self {
        self.offer_cache = cache;
        self
    }
}
