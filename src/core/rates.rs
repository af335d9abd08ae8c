//! Exchange-rate abstractions.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One fetched snapshot of conversion rates quoted against a base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: String,
    pub rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn rate_for(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Currency codes present in the snapshot, sorted for stable listings.
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.rates.keys().cloned().collect();
        codes.sort();
        codes
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the full conversion-rate table for a base currency.
    async fn fetch_rates(&self, base: &str) -> Result<RateTable>;
}
