use crate::core::cache::RateCache;
use crate::core::rates::RateTable;
use anyhow::Result;
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    table: RateTable,
    expires_at: Option<SystemTime>,
}

/// Persistent rate cache. CLI invocations are short-lived, so tables are
/// kept on disk and re-fetches inside the TTL skip the network entirely.
/// Expired entries are dropped on read.
pub struct FjallRateCache {
    _keyspace: Keyspace,
    partition: PartitionHandle,
}

impl FjallRateCache {
    pub fn open(cache_dir: &Path) -> Result<Self> {
        let keyspace = fjall::Config::new(cache_dir).open()?;
        let partition = keyspace.open_partition("rates", PartitionCreateOptions::default())?;
        Ok(Self {
            _keyspace: keyspace,
            partition,
        })
    }
}

#[async_trait]
impl RateCache for FjallRateCache {
    async fn get(&self, base: &str) -> Option<RateTable> {
        let lookup: Result<Option<RateTable>> = (|| {
            if let Some(raw) = self.partition.get(base)? {
                let entry: CacheEntry = serde_json::from_slice(&raw)?;
                if let Some(expires_at) = entry.expires_at {
                    if SystemTime::now() > expires_at {
                        debug!("Rate cache entry expired for base: {base}");
                        self.partition.remove(base)?;
                        return Ok(None);
                    }
                }
                debug!("Rate cache HIT for base: {base}");
                return Ok(Some(entry.table));
            }
            debug!("Rate cache MISS for base: {base}");
            Ok(None)
        })();

        match lookup {
            Ok(table) => table,
            Err(e) => {
                debug!("Rate cache read error: {e}");
                None
            }
        }
    }

    async fn put(&self, base: &str, table: RateTable, ttl: Option<Duration>) {
        let store: Result<()> = (|| {
            let entry = CacheEntry {
                table,
                expires_at: ttl.map(|d| SystemTime::now() + d),
            };
            self.partition.insert(base, serde_json::to_vec(&entry)?)?;
            debug!("Rate cache PUT for base: {base}");
            Ok(())
        })();
        if let Err(e) = store {
            debug!("Rate cache write error: {e}");
        }
    }
}
