use super::{chart, ui};
use crate::core::analytics::{self, DateFilter};
use crate::core::numeric::parse_or_zero;
use crate::core::record::{CurrencyPair, ExchangeRecord};
use crate::store::RecordStore;
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;

/// View options for one dashboard invocation.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Restrict pair tables and trends to this source currency.
    pub currency: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    /// 1-based page number shown in every pair table.
    pub page: usize,
    pub page_size: usize,
}

pub fn run(records: &[ExchangeRecord], options: &DashboardOptions) -> Result<()> {
    if records.is_empty() {
        println!(
            "No records yet. Run {} to log your first conversion.",
            ui::style_text("fxlog add", ui::StyleType::TotalLabel)
        );
        return Ok(());
    }

    let date_filter = DateFilter::from_bounds(options.from_date, options.to_date);
    if date_filter.is_suspended() {
        println!(
            "{}\n",
            ui::style_text(
                "Start date cannot be after end date! Date filtering is suspended.",
                ui::StyleType::Error
            )
        );
    }

    print_stats_cards(records);

    let stats = analytics::aggregate_by_source_currency(records);
    println!("\n{}", ui::style_text("Market Overview", ui::StyleType::Title));
    print!("{}", chart::volume_bars(&stats));
    println!("\n{}", ui::style_text("Transaction Mix", ui::StyleType::Title));
    print!("{}", chart::transaction_mix(&stats));

    let filter_currency = options.currency.as_deref();
    if let Some(currency) = filter_currency {
        if records.iter().any(|r| r.from_currency == currency) {
            print_rate_trends(records, currency);
        } else {
            println!(
                "\n{}",
                ui::style_text(
                    &format!("No transactions found for {currency}."),
                    ui::StyleType::Error
                )
            );
        }
    }

    let pairs = analytics::distinct_pairs(records, filter_currency);
    for pair in &pairs {
        let rows: Vec<ExchangeRecord> = records
            .iter()
            .filter(|r| r.from_currency == pair.from && r.to_currency == pair.to)
            .cloned()
            .collect();
        let rows = date_filter.apply(&rows);
        if rows.is_empty() {
            continue;
        }
        ui::print_separator();
        println!(
            "{}",
            pair_table(pair, &rows, options.page.saturating_sub(1), options.page_size)
        );
    }

    Ok(())
}

/// Destroys the whole record collection after confirmation. Irrecoverable.
pub fn run_clear(store: &RecordStore, assume_yes: bool) -> Result<()> {
    if !assume_yes && !ui::confirm("Delete all records permanently?") {
        println!("Aborted.");
        return Ok(());
    }
    store.clear()?;
    println!("All records cleared.");
    Ok(())
}

fn print_stats_cards(records: &[ExchangeRecord]) {
    let most_used =
        analytics::most_frequent_source(records).unwrap_or_else(|| "N/A".to_string());
    println!(
        "{} {}    {} {}",
        ui::style_text("Transactions:", ui::StyleType::TotalLabel),
        ui::style_text(&records.len().to_string(), ui::StyleType::TotalValue),
        ui::style_text("Top Currency:", ui::StyleType::TotalLabel),
        ui::style_text(&most_used, ui::StyleType::TotalValue),
    );
}

fn print_rate_trends(records: &[ExchangeRecord], currency: &str) {
    println!(
        "\n{}",
        ui::style_text("Market Trend Analysis", ui::StyleType::Title)
    );
    for pair in analytics::distinct_pairs(records, Some(currency)) {
        let rows: Vec<ExchangeRecord> = records
            .iter()
            .filter(|r| r.from_currency == pair.from && r.to_currency == pair.to)
            .cloned()
            .collect();
        let spark = chart::rate_trend(&rows);
        println!(
            "  {:<12} {}  {}",
            format!("{} ➔ {}", pair.from, pair.to),
            spark,
            ui::style_text(&format!("{} points", rows.len()), ui::StyleType::Subtle)
        );
    }
}

/// Renders one currency-pair table: a page of rows plus a footer with
/// totals computed over the whole (filtered) row set, not just the page.
pub fn pair_table(
    pair: &CurrencyPair,
    rows: &[ExchangeRecord],
    page_index: usize,
    page_size: usize,
) -> String {
    let totals = analytics::column_totals(rows);
    let visible = analytics::paginate(rows, page_index, page_size);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Name"),
        ui::header_cell("Amount"),
        ui::header_cell("Rate"),
        ui::header_cell("Date"),
        ui::header_cell(&format!("Net Amount ({})", pair.to)),
    ]);

    for row in visible {
        table.add_row(vec![
            Cell::new(row.user_id),
            Cell::new(&row.name),
            ui::amount_cell(&format!("{:.2} {}", parse_or_zero(&row.real_amount), pair.from)),
            ui::amount_cell(&format!("{:.4}", row.rate)),
            Cell::new(&row.date),
            ui::amount_cell(&format!("{:.2} {}", parse_or_zero(&row.amount), pair.to)),
        ]);
    }
    if visible.is_empty() {
        table.add_row(vec![
            Cell::new(""),
            Cell::new("No data on this page"),
            Cell::new(""),
            Cell::new(""),
            Cell::new(""),
            Cell::new(""),
        ]);
    }

    table.add_row(vec![
        Cell::new(""),
        Cell::new("Total"),
        ui::total_cell(&format!("{:.2} {}", totals.real_amount, pair.from)),
        ui::total_cell(&format!("{:.2}", totals.rate)),
        Cell::new(""),
        ui::total_cell(&format!("{:.2} {}", totals.converted_amount, pair.to)),
    ]);

    format!(
        "{}   {}\n{}",
        ui::style_text(&pair.to_string(), ui::StyleType::Title),
        ui::style_text(&format!("Total: {}", rows.len()), ui::StyleType::Subtle),
        table
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, real: &str, rate: f64, amount: &str) -> ExchangeRecord {
        ExchangeRecord {
            user_id: id,
            name: "Asad".to_string(),
            from_currency: "USD".to_string(),
            to_currency: "PKR".to_string(),
            real_amount: real.to_string(),
            rate,
            amount: amount.to_string(),
            date: "2024-01-01 10:00:00".to_string(),
        }
    }

    fn usd_pkr() -> CurrencyPair {
        CurrencyPair {
            from: "USD".to_string(),
            to: "PKR".to_string(),
        }
    }

    #[test]
    fn test_pair_table_shows_rows_and_totals() {
        let rows = vec![
            record(1, "100", 280.0, "28000.00"),
            record(2, "50", 280.0, "14000.00"),
        ];
        let rendered = pair_table(&usd_pkr(), &rows, 0, 5);

        assert!(rendered.contains("USD to PKR"));
        assert!(rendered.contains("Total: 2"));
        assert!(rendered.contains("Net Amount (PKR)"));
        assert!(rendered.contains("28000.00 PKR"));
        // Footer totals over the full set.
        assert!(rendered.contains("150.00 USD"));
        assert!(rendered.contains("42000.00 PKR"));
    }

    #[test]
    fn test_pair_table_totals_cover_all_pages() {
        let rows = vec![
            record(1, "100", 280.0, "28000.00"),
            record(2, "50", 280.0, "14000.00"),
            record(3, "25", 280.0, "7000.00"),
        ];
        // Page 2 shows only the third row, totals still cover all three.
        let rendered = pair_table(&usd_pkr(), &rows, 1, 2);
        assert!(rendered.contains("25.00 USD"));
        assert!(!rendered.contains("100.00 USD"));
        assert!(rendered.contains("175.00 USD"));
        assert!(rendered.contains("49000.00 PKR"));
    }

    #[test]
    fn test_pair_table_out_of_range_page() {
        let rows = vec![record(1, "100", 280.0, "28000.00")];
        let rendered = pair_table(&usd_pkr(), &rows, 9, 5);
        assert!(rendered.contains("No data on this page"));
        assert!(rendered.contains("100.00 USD"));
    }
}
