use crate::core::cache::RateCache;
use crate::core::rates::RateTable;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct CachedTable {
    table: RateTable,
    expires_at: Option<Instant>,
}

/// In-memory rate cache. Holds tables for the lifetime of one process;
/// used in tests and as the fallback when the disk cache cannot open.
pub struct MemoryRateCache {
    inner: Arc<Mutex<HashMap<String, CachedTable>>>,
}

impl MemoryRateCache {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for MemoryRateCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateCache for MemoryRateCache {
    async fn get(&self, base: &str) -> Option<RateTable> {
        let cache = self.inner.lock().await;
        if let Some(entry) = cache.get(base) {
            if let Some(expiry) = entry.expires_at {
                if expiry < Instant::now() {
                    debug!("Rate cache entry expired for base: {base}");
                    return None;
                }
            }
            debug!("Rate cache HIT for base: {base}");
            return Some(entry.table.clone());
        }
        debug!("Rate cache MISS for base: {base}");
        None
    }

    async fn put(&self, base: &str, table: RateTable, ttl: Option<Duration>) {
        let expires_at = ttl.map(|duration| Instant::now() + duration);
        let mut cache = self.inner.lock().await;
        debug!("Rate cache PUT for base: {base}");
        cache.insert(base.to_string(), CachedTable { table, expires_at });
    }
}
