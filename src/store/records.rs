//! The local record store: the full conversion-entry collection as one
//! serialized JSON blob in one fixed file.

use crate::core::record::ExchangeRecord;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name of the persisted record collection inside the data directory.
const STORE_FILE: &str = "exchange_data.json";

/// Exclusive owner of the persisted record collection. Other components
/// only ever see the loaded `Vec<ExchangeRecord>`.
///
/// Records are stored newest first. They are never edited or removed
/// singly; the only destructive operation is a wholesale [`clear`].
///
/// [`clear`]: RecordStore::clear
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Self {
        RecordStore {
            path: data_dir.as_ref().join(STORE_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full collection. A store that has never been written
    /// reads as empty; a corrupt blob is an error rather than data loss.
    pub fn load(&self) -> Result<Vec<ExchangeRecord>> {
        if !self.path.exists() {
            debug!("Record store not present at {}", self.path.display());
            return Ok(Vec::new());
        }
        let blob = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read record store: {}", self.path.display()))?;
        let records: Vec<ExchangeRecord> = serde_json::from_str(&blob)
            .with_context(|| format!("Failed to parse record store: {}", self.path.display()))?;
        debug!("Loaded {} records", records.len());
        Ok(records)
    }

    /// Prepends a new record (newest first) and persists the whole blob.
    pub fn prepend(&self, record: ExchangeRecord) -> Result<()> {
        let mut records = self.load()?;
        records.insert(0, record);
        self.save(&records)
    }

    /// Destroys the entire collection in one operation. Irrecoverable.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to clear record store: {}", self.path.display()))?;
        }
        debug!("Record store cleared");
        Ok(())
    }

    fn save(&self, records: &[ExchangeRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let blob = serde_json::to_string(records).context("Failed to serialize records")?;
        fs::write(&self.path, blob)
            .with_context(|| format!("Failed to write record store: {}", self.path.display()))?;
        debug!("Saved {} records", records.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(id: u64, name: &str) -> ExchangeRecord {
        ExchangeRecord {
            user_id: id,
            name: name.to_string(),
            from_currency: "USD".to_string(),
            to_currency: "PKR".to_string(),
            real_amount: "100".to_string(),
            rate: 280.0,
            amount: "28000.00".to_string(),
            date: "2024-01-01 10:00:00".to_string(),
        }
    }

    #[test]
    fn test_missing_store_loads_empty() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_prepend_keeps_newest_first() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path());

        store.prepend(record(1, "first")).unwrap();
        store.prepend(record(2, "second")).unwrap();

        let records = store.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "second");
        assert_eq!(records[1].name, "first");
    }

    #[test]
    fn test_clear_empties_store_and_removes_file() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path());

        store.prepend(record(1, "first")).unwrap();
        assert!(store.path().exists());

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_empty());

        // Clearing an already-empty store is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_blob_is_an_error() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path());
        std::fs::write(store.path(), "not json").unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn test_loads_historical_camel_case_blob() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path());
        std::fs::write(
            store.path(),
            r#"[{"userId":1700000000000,"name":"Sana","fromCurrency":"USD","toCurrency":"EUR","realAmount":"fifty","amount":"","date":"2024-02-01 09:00:00"}]"#,
        )
        .unwrap();

        let records = store.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].rate, 0.0);
        // Lenient amounts: malformed text contributes zero to totals.
        let totals = crate::core::analytics::column_totals(&records);
        assert_eq!(totals.real_amount, 0.0);
        assert_eq!(totals.converted_amount, 0.0);
    }
}
