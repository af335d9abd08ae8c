use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::cache::RateCache;
use crate::core::rates::{RateProvider, RateTable};

// ExchangeRateApiProvider implementation for RateProvider
//
// Targets the exchangerate-api.com v6 surface: one GET per base currency
// returning the full conversion-rate table. No retry or backoff; a failed
// fetch surfaces as a plain error and the caller decides what to do.
pub struct ExchangeRateApiProvider {
    base_url: String,
    api_key: String,
    cache: Arc<dyn RateCache>,
    ttl: Option<Duration>,
}

impl ExchangeRateApiProvider {
    pub fn new(
        base_url: &str,
        api_key: &str,
        cache: Arc<dyn RateCache>,
        ttl: Option<Duration>,
    ) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            cache,
            ttl,
        }
    }
}

#[derive(Deserialize, Debug)]
struct LatestRatesResponse {
    conversion_rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(
        name = "RateFetch",
        skip(self),
        fields(base = %base)
    )]
    async fn fetch_rates(&self, base: &str) -> Result<RateTable> {
        if let Some(cached) = self.cache.get(base).await {
            return Ok(cached);
        }

        let url = format!("{}/{}/latest/{}", self.base_url, self.api_key, base);
        debug!("Requesting rates from {}/<key>/latest/{}", self.base_url, base);

        let client = reqwest::Client::builder().user_agent("fxlog/1.0").build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base currency: {}", e, base))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base currency: {}",
                response.status(),
                base
            ));
        }

        let text = response.text().await?;

        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse rates response for {}: {}", base, e))?;

        if data.conversion_rates.is_empty() {
            return Err(anyhow!("No rates found for base currency: {}", base));
        }

        let table = RateTable {
            base: base.to_string(),
            rates: data.conversion_rates,
        };

        self.cache.put(base, table.clone(), self.ttl).await;

        Ok(table)
    }
}
