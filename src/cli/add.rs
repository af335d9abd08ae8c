use super::ui;
use crate::core::rates::{RateProvider, RateTable};
use crate::core::submission::EntryDraft;
use crate::store::RecordStore;
use anyhow::Result;
use std::collections::HashMap;
use tracing::debug;

/// The entry form flow: fetch rates for the chosen source currency, run
/// the draft through validation and store the record. A rejected draft
/// stores nothing.
pub async fn run(
    store: &RecordStore,
    provider: &(dyn RateProvider + Send + Sync),
    draft: &EntryDraft,
) -> Result<()> {
    let base = draft
        .from_currency
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());

    let rates = match base {
        Some(base) => {
            let spinner = ui::new_spinner(&format!("Fetching rates for {base}..."));
            let fetched = provider.fetch_rates(base).await;
            spinner.finish_and_clear();
            fetched?
        }
        // No source currency; let the validator report the missing field.
        None => RateTable {
            base: String::new(),
            rates: HashMap::new(),
        },
    };
    debug!("Validating draft against {} rates", rates.rates.len());

    let record = draft.validate(&rates)?;
    store.prepend(record.clone())?;

    println!(
        "{} {} {} ➔ {} {} {}",
        ui::style_text("Logged:", ui::StyleType::TotalLabel),
        record.real_amount,
        record.from_currency,
        ui::style_text(&record.amount, ui::StyleType::TotalValue),
        record.to_currency,
        ui::style_text(&format!("(rate {:.4})", record.rate), ui::StyleType::Subtle),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    struct MockRateProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl MockRateProvider {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl RateProvider for &MockRateProvider {
        async fn fetch_rates(&self, base: &str) -> Result<RateTable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(anyhow!("Request error: connection refused for base currency: {base}"));
            }
            Ok(RateTable {
                base: base.to_string(),
                rates: HashMap::from([("PKR".to_string(), 280.0), ("EUR".to_string(), 0.9)]),
            })
        }
    }

    fn draft(name: &str, amount: &str, from: &str, to: &str) -> EntryDraft {
        EntryDraft {
            name: Some(name.to_string()),
            amount: Some(amount.to_string()),
            from_currency: Some(from.to_string()),
            to_currency: Some(to.to_string()),
        }
    }

    #[tokio::test]
    async fn test_valid_entry_is_stored() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path());
        let provider = MockRateProvider::new(false);

        run(&store, &&provider, &draft("Asad", "100", "USD", "PKR"))
            .await
            .unwrap();

        let records = store.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, "28000.00");
        assert_eq!(records[0].rate, 280.0);
    }

    #[tokio::test]
    async fn test_same_currency_rejection_stores_nothing() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path());
        let provider = MockRateProvider::new(false);

        let result = run(&store, &&provider, &draft("Asad", "100", "USD", "USD")).await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "Source and target currencies cannot be the same"
        );
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_rate_rejection_stores_nothing() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path());
        let provider = MockRateProvider::new(false);

        let result = run(&store, &&provider, &draft("Asad", "100", "USD", "JPY")).await;
        assert!(result.is_err());
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_source_currency_skips_the_fetch() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path());
        let provider = MockRateProvider::new(false);

        let no_source = EntryDraft {
            from_currency: None,
            ..draft("Asad", "100", "USD", "PKR")
        };
        let result = run(&store, &&provider, &no_source).await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().to_string(), "Please fill all fields");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces_and_stores_nothing() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path());
        let provider = MockRateProvider::new(true);

        let result = run(&store, &&provider, &draft("Asad", "100", "USD", "PKR")).await;
        assert!(result.is_err());
        assert!(store.load().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_new_entries_are_prepended() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path());
        let provider = MockRateProvider::new(false);

        run(&store, &&provider, &draft("first", "100", "USD", "PKR"))
            .await
            .unwrap();
        run(&store, &&provider, &draft("second", "50", "USD", "EUR"))
            .await
            .unwrap();

        let records = store.load().unwrap();
        assert_eq!(records[0].name, "second");
        assert_eq!(records[1].name, "first");
    }
}
