//! Textual charts over the aggregated record data: volume bars, the
//! transaction mix and rate-trend sparklines.

use crate::core::analytics::SourceCurrencyStats;
use crate::core::record::ExchangeRecord;
use chrono::NaiveDateTime;
use console::style;

const BAR_WIDTH: usize = 40;
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Horizontal bar chart of entered volume per source currency, widths
/// scaled to the largest total.
pub fn volume_bars(stats: &[SourceCurrencyStats]) -> String {
    let max_total = stats
        .iter()
        .map(|entry| entry.total_amount)
        .fold(0.0_f64, f64::max);

    let mut out = String::new();
    for entry in stats {
        let width = if max_total > 0.0 {
            ((entry.total_amount / max_total) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar = "█".repeat(width.max(1));
        let label = if entry.count == 1 { "entry" } else { "entries" };
        out.push_str(&format!(
            "  {:<5} {} {:.2} ({} {})\n",
            entry.currency,
            style(bar).cyan(),
            entry.total_amount,
            entry.count,
            label
        ));
    }
    out
}

/// Share of entries per source currency, by count.
pub fn transaction_mix(stats: &[SourceCurrencyStats]) -> String {
    let total: usize = stats.iter().map(|entry| entry.count).sum();
    if total == 0 {
        return String::new();
    }

    let mut out = String::new();
    for entry in stats {
        let share = (entry.count as f64 / total as f64) * 100.0;
        out.push_str(&format!(
            "  {:<5} {:>5.1}%  {}\n",
            entry.currency,
            share,
            style(format!("{} of {}", entry.count, total)).dim()
        ));
    }
    out
}

/// Sparkline of conversion rates over time for one pair's records,
/// oldest on the left. Records without a parsable date are skipped.
pub fn rate_trend(records: &[ExchangeRecord]) -> String {
    let mut dated: Vec<(NaiveDateTime, f64)> = records
        .iter()
        .filter_map(|record| record.parsed_date().map(|stamp| (stamp, record.rate)))
        .collect();
    dated.sort_by_key(|(stamp, _)| *stamp);

    let rates: Vec<f64> = dated.into_iter().map(|(_, rate)| rate).collect();
    if rates.is_empty() {
        return String::new();
    }

    let min = rates.iter().copied().fold(f64::INFINITY, f64::min);
    let max = rates.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    rates
        .iter()
        .map(|rate| {
            let level = if span > 0.0 {
                (((rate - min) / span) * 7.0).round() as usize
            } else {
                0
            };
            SPARK_LEVELS[level.min(7)]
        })
        .collect()
}
