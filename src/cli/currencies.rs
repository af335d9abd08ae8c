use super::ui;
use crate::core::rates::{RateProvider, RateTable};
use anyhow::Result;
use comfy_table::{Cell, Table};

/// Lists currency codes and their rates for a base currency, optionally
/// narrowed by a case-insensitive substring search.
pub async fn run(
    provider: &(dyn RateProvider + Send + Sync),
    base: &str,
    search: Option<&str>,
) -> Result<()> {
    let spinner = ui::new_spinner(&format!("Fetching rates for {base}..."));
    let table = provider.fetch_rates(base).await;
    spinner.finish_and_clear();
    let table = table?;

    let rendered = build_table(&table, search);
    println!(
        "{}",
        ui::style_text(&format!("Rates for 1 {base}"), ui::StyleType::Title)
    );
    println!("{rendered}");
    Ok(())
}

fn build_table(rates: &RateTable, search: Option<&str>) -> Table {
    let query = search.map(str::to_lowercase);

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Currency"), ui::header_cell("Rate")]);

    for code in rates.codes() {
        if let Some(query) = &query {
            if !code.to_lowercase().contains(query) {
                continue;
            }
        }
        let rate = rates.rate_for(&code).unwrap_or(0.0);
        table.add_row(vec![Cell::new(&code), ui::amount_cell(&format!("{rate:.4}"))]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn usd_table() -> RateTable {
        RateTable {
            base: "USD".to_string(),
            rates: HashMap::from([
                ("PKR".to_string(), 280.25),
                ("EUR".to_string(), 0.91),
                ("GBP".to_string(), 0.78),
            ]),
        }
    }

    #[test]
    fn test_build_table_lists_all_codes_sorted() {
        let rendered = build_table(&usd_table(), None).to_string();
        assert!(rendered.contains("EUR"));
        assert!(rendered.contains("GBP"));
        assert!(rendered.contains("PKR"));
        assert!(rendered.contains("280.2500"));
    }

    #[test]
    fn test_build_table_search_is_case_insensitive() {
        let rendered = build_table(&usd_table(), Some("pk")).to_string();
        assert!(rendered.contains("PKR"));
        assert!(!rendered.contains("EUR"));
        assert!(!rendered.contains("GBP"));
    }
}
