//! Conversion record model shared by the store, the analytics engine and
//! the terminal views.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp format used for the `date` field of stored records.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One logged currency exchange entry.
///
/// Fields serialize in camelCase so blobs written by earlier versions of
/// the tracker load unchanged. `real_amount` and `amount` stay as the text
/// they were stored with; every reader goes through
/// [`crate::core::numeric::parse_or_zero`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRecord {
    /// Time-based id in epoch milliseconds, assigned once at creation.
    pub user_id: u64,
    pub name: String,
    pub from_currency: String,
    pub to_currency: String,
    /// The amount exactly as the user entered it.
    pub real_amount: String,
    /// Conversion multiplier in effect at creation. Blobs written before
    /// the missing-rate guard existed may lack this field.
    #[serde(default)]
    pub rate: f64,
    /// `real_amount * rate`, computed once at creation, two decimals.
    pub amount: String,
    /// Creation timestamp, local time, formatted with [`DATE_FORMAT`].
    pub date: String,
}

impl ExchangeRecord {
    /// Parses the stored `date` text back into a timestamp. `None` when the
    /// text does not match [`DATE_FORMAT`].
    pub fn parsed_date(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.date, DATE_FORMAT).ok()
    }
}

/// A (source, target) currency code combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub from: String,
    pub to: String,
}

impl std::fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.from, self.to)
    }
}
