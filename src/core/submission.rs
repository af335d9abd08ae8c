//! Entry form validation: an ordered check sequence with no side effects
//! until every check passes.

use crate::core::rates::RateTable;
use crate::core::record::{DATE_FORMAT, ExchangeRecord};
use chrono::{Local, Utc};
use thiserror::Error;

/// Why a submission was rejected. One variant per form check, each with
/// its own message.
#[derive(Debug, Error, PartialEq)]
pub enum SubmitError {
    #[error("Please fill all fields")]
    MissingFields,
    #[error("Amount must be a positive number")]
    InvalidAmount,
    #[error("Source and target currencies cannot be the same")]
    SameCurrency,
    #[error("No conversion rate available for {0}")]
    RateUnavailable(String),
}

/// Raw form input. Every field is optional until validation runs.
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub from_currency: Option<String>,
    pub to_currency: Option<String>,
}

impl EntryDraft {
    /// Runs the check sequence against the fetched rate table and builds
    /// the record on success.
    ///
    /// Checks run in order: fields present, amount a positive number,
    /// currencies distinct, rate present in the table. The first failure
    /// aborts; a rejected draft leaves no trace anywhere. A missing rate
    /// is a hard failure so an unconverted amount can never be stored.
    pub fn validate(&self, rates: &RateTable) -> Result<ExchangeRecord, SubmitError> {
        let name = present(self.name.as_deref())?;
        let amount = present(self.amount.as_deref())?;
        let from = present(self.from_currency.as_deref())?;
        let to = present(self.to_currency.as_deref())?;

        let real: f64 = amount
            .parse()
            .ok()
            .filter(|value: &f64| value.is_finite() && *value > 0.0)
            .ok_or(SubmitError::InvalidAmount)?;

        if from == to {
            return Err(SubmitError::SameCurrency);
        }

        let rate = rates
            .rate_for(to)
            .ok_or_else(|| SubmitError::RateUnavailable(to.to_string()))?;

        Ok(ExchangeRecord {
            user_id: Utc::now().timestamp_millis() as u64,
            name: name.to_string(),
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            real_amount: amount.to_string(),
            rate,
            amount: format!("{:.2}", real * rate),
            date: Local::now().format(DATE_FORMAT).to_string(),
        })
    }
}

fn present(field: Option<&str>) -> Result<&str, SubmitError> {
    field
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or(SubmitError::MissingFields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn usd_rates() -> RateTable {
        RateTable {
            base: "USD".to_string(),
            rates: HashMap::from([("PKR".to_string(), 280.0), ("EUR".to_string(), 0.9)]),
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

    #[test]
    fn test_accepts_valid_draft() {
        let record = draft("Asad", "100", "USD", "PKR").validate(&usd_rates()).unwrap();
        assert_eq!(record.name, "Asad");
        assert_eq!(record.from_currency, "USD");
        assert_eq!(record.to_currency, "PKR");
        assert_eq!(record.real_amount, "100");
        assert_eq!(record.rate, 280.0);
        assert_eq!(record.amount, "28000.00");
        assert!(record.user_id > 0);
        assert!(record.parsed_date().is_some());
    }

    #[test]
    fn test_converted_amount_has_two_decimals() {
        let record = draft("Sana", "50", "USD", "EUR").validate(&usd_rates()).unwrap();
        assert_eq!(record.amount, "45.00");
    }

    #[test]
    fn test_rejects_missing_fields() {
        let mut empty_name = draft("", "100", "USD", "PKR");
        assert_eq!(empty_name.validate(&usd_rates()), Err(SubmitError::MissingFields));

        empty_name.name = None;
        assert_eq!(empty_name.validate(&usd_rates()), Err(SubmitError::MissingFields));

        let no_amount = EntryDraft {
            amount: None,
            ..draft("Asad", "100", "USD", "PKR")
        };
        assert_eq!(no_amount.validate(&usd_rates()), Err(SubmitError::MissingFields));
    }

    #[test]
    fn test_rejects_non_numeric_or_negative_amount() {
        for amount in ["abc", "-5", "0", "NaN"] {
            assert_eq!(
                draft("Asad", amount, "USD", "PKR").validate(&usd_rates()),
                Err(SubmitError::InvalidAmount),
                "amount {amount:?}"
            );
        }
    }

    #[test]
    fn test_rejects_same_currency_pair() {
        assert_eq!(
            draft("Asad", "100", "USD", "USD").validate(&usd_rates()),
            Err(SubmitError::SameCurrency)
        );
    }

    #[test]
    fn test_missing_rate_is_a_hard_failure() {
        assert_eq!(
            draft("Asad", "100", "USD", "JPY").validate(&usd_rates()),
            Err(SubmitError::RateUnavailable("JPY".to_string()))
        );
    }

    #[test]
    fn test_checks_run_in_order() {
        // Presence failures win over the later checks.
        let broken = EntryDraft {
            name: None,
            amount: Some("abc".to_string()),
            from_currency: Some("USD".to_string()),
            to_currency: Some("USD".to_string()),
        };
        assert_eq!(broken.validate(&usd_rates()), Err(SubmitError::MissingFields));

        // An invalid amount wins over the same-currency check.
        assert_eq!(
            draft("Asad", "abc", "USD", "USD").validate(&usd_rates()),
            Err(SubmitError::InvalidAmount)
        );
    }
}
