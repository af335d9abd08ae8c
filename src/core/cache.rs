//! Cache seam for fetched rate tables.

use crate::core::rates::RateTable;
use async_trait::async_trait;
use std::time::Duration;

/// TTL-bounded storage for rate tables keyed by base currency.
///
/// A `put` fully replaces any earlier table for the same base, which is
/// what makes a fresh fetch supersede an in-flight or cached one.
#[async_trait]
pub trait RateCache: Send + Sync {
    async fn get(&self, base: &str) -> Option<RateTable>;
    async fn put(&self, base: &str, table: RateTable, ttl: Option<Duration>);
}
