//! Derives the grouped views behind the dashboard: distinct currency
//! pairs, date-range filtering, per-source aggregation, pagination and
//! table footer totals.

use crate::core::numeric::parse_or_zero;
use crate::core::record::{CurrencyPair, ExchangeRecord};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Totals over a visible record set, used for table footers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnTotals {
    pub real_amount: f64,
    pub rate: f64,
    pub converted_amount: f64,
}

/// Accumulated volume and entry count for one source currency.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCurrencyStats {
    pub currency: String,
    pub total_amount: f64,
    pub count: usize,
}

/// Date-range filter state.
///
/// An inverted range (start after end) suspends the filter instead of
/// silently passing data through, so callers can report the state and
/// still render something sensible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateFilter {
    Unbounded,
    Active { start: NaiveDate, end: NaiveDate },
    Suspended,
}

impl DateFilter {
    /// Builds a filter from optional bounds. Both bounds must be present
    /// for the filter to activate.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(start), Some(end)) if start > end => DateFilter::Suspended,
            (Some(start), Some(end)) => DateFilter::Active { start, end },
            _ => DateFilter::Unbounded,
        }
    }

    pub fn is_suspended(&self) -> bool {
        matches!(self, DateFilter::Suspended)
    }

    /// Keeps records whose timestamp falls on or between the bound days,
    /// inclusive of the whole start and end days. `Unbounded` and
    /// `Suspended` return the input unchanged. Records whose date text
    /// does not parse are excluded by an active filter.
    pub fn apply(&self, records: &[ExchangeRecord]) -> Vec<ExchangeRecord> {
        match self {
            DateFilter::Active { start, end } => records
                .iter()
                .filter(|record| {
                    record
                        .parsed_date()
                        .is_some_and(|stamp| (*start..=*end).contains(&stamp.date()))
                })
                .cloned()
                .collect(),
            DateFilter::Unbounded | DateFilter::Suspended => records.to_vec(),
        }
    }
}

/// Every unique `(from, to)` combination present in `records`, in order of
/// first occurrence. A filter currency restricts the result to pairs whose
/// source equals it.
pub fn distinct_pairs(records: &[ExchangeRecord], from_filter: Option<&str>) -> Vec<CurrencyPair> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for record in records {
        let key = (record.from_currency.clone(), record.to_currency.clone());
        if seen.insert(key) {
            pairs.push(CurrencyPair {
                from: record.from_currency.clone(),
                to: record.to_currency.clone(),
            });
        }
    }
    match from_filter {
        Some(currency) => pairs.into_iter().filter(|p| p.from == currency).collect(),
        None => pairs,
    }
}

/// Accumulates entered amounts and entry counts keyed by source currency,
/// rows in first-occurrence order. Amount text goes through parse-or-zero.
pub fn aggregate_by_source_currency(records: &[ExchangeRecord]) -> Vec<SourceCurrencyStats> {
    let mut stats: Vec<SourceCurrencyStats> = Vec::new();
    for record in records {
        match stats.iter_mut().find(|s| s.currency == record.from_currency) {
            Some(entry) => {
                entry.total_amount += parse_or_zero(&record.real_amount);
                entry.count += 1;
            }
            None => stats.push(SourceCurrencyStats {
                currency: record.from_currency.clone(),
                total_amount: parse_or_zero(&record.real_amount),
                count: 1,
            }),
        }
    }
    stats
}

/// The source currency with the highest entry count. Equal counts keep the
/// earlier currency; an empty record set yields `None`.
pub fn most_frequent_source(records: &[ExchangeRecord]) -> Option<String> {
    aggregate_by_source_currency(records)
        .into_iter()
        .reduce(|best, next| if best.count >= next.count { best } else { next })
        .map(|stats| stats.currency)
}

/// A contiguous page of at most `page_size` items starting at
/// `page_index * page_size`. An out-of-range page is empty, not an error.
pub fn paginate<T>(items: &[T], page_index: usize, page_size: usize) -> &[T] {
    let start = page_index.saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Sums the entered amount, rate and converted amount columns over the
/// visible record set. Non-numeric text coerces to zero.
pub fn column_totals(records: &[ExchangeRecord]) -> ColumnTotals {
    records
        .iter()
        .fold(ColumnTotals::default(), |mut totals, record| {
            totals.real_amount += parse_or_zero(&record.real_amount);
            totals.rate += record.rate;
            totals.converted_amount += parse_or_zero(&record.amount);
            totals
        })
}
