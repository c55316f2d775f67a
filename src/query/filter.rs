//! Selects the transactions that match a set of optional constraints.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::models::{Transaction, TransactionStatus, TransactionTypeId};

/// The constraints a transaction must meet to be selected by [filter].
///
/// `None` means the dimension is not constrained, so the default spec
/// selects every transaction. Bounds are inclusive and are never swapped: a
/// `date_from` after `date_to` (or `amount_min` above `amount_max`) selects
/// nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Case-insensitive substring of the description.
    pub text_query: Option<String>,
    /// The earliest date to include.
    pub date_from: Option<Date>,
    /// The latest date to include.
    pub date_to: Option<Date>,
    /// The ID of the embedded transaction type.
    pub category_id: Option<TransactionTypeId>,
    /// The status to include.
    pub status: Option<TransactionStatus>,
    /// The smallest amount to include.
    pub amount_min: Option<Decimal>,
    /// The largest amount to include.
    pub amount_max: Option<Decimal>,
}

impl FilterSpec {
    /// Whether `transaction` meets every constraint.
    ///
    /// The equality and range checks run before the substring search, which is
    /// the only check that allocates.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.status.is_none_or(|status| transaction.status == status)
            && self
                .category_id
                .is_none_or(|category_id| transaction.category.id == category_id)
            && self.date_from.is_none_or(|from| transaction.date >= from)
            && self.date_to.is_none_or(|to| transaction.date <= to)
            && self.amount_min.is_none_or(|min| transaction.amount >= min)
            && self.amount_max.is_none_or(|max| transaction.amount <= max)
            && self.text_query.as_deref().is_none_or(|query| {
                transaction
                    .description
                    .to_lowercase()
                    .contains(&query.to_lowercase())
            })
    }
}

/// Select the transactions that match `spec`, keeping their relative order.
pub fn filter(transactions: &[Transaction], spec: &FilterSpec) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| spec.matches(transaction))
        .cloned()
        .collect()
}

/// Filter values as they arrive from a form or the command line.
///
/// Use [FilterParams::into_spec] to turn them into a [FilterSpec].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterParams {
    /// Text to search descriptions for.
    pub text_query: String,
    /// The earliest date, formatted as `YYYY-MM-DD`.
    pub date_from: String,
    /// The latest date, formatted as `YYYY-MM-DD`.
    pub date_to: String,
    /// A transaction type ID.
    pub category_id: String,
    /// `pending` or `completed`.
    pub status: String,
    /// The smallest amount.
    pub amount_min: String,
    /// The largest amount.
    pub amount_max: String,
}

impl FilterParams {
    /// Convert the raw values into a [FilterSpec].
    ///
    /// Every value is trimmed. Blank values and values that do not parse are
    /// treated as absent rather than as errors.
    pub fn into_spec(self) -> FilterSpec {
        let text_query = self.text_query.trim();

        FilterSpec {
            text_query: (!text_query.is_empty()).then(|| text_query.to_owned()),
            date_from: parse_date("date_from", &self.date_from),
            date_to: parse_date("date_to", &self.date_to),
            category_id: parse_field("category_id", &self.category_id),
            status: parse_field("status", &self.status),
            amount_min: parse_field("amount_min", &self.amount_min),
            amount_max: parse_field("amount_max", &self.amount_max),
        }
    }
}

fn parse_date(field: &str, raw: &str) -> Option<Date> {
    let raw = raw.trim();

    if raw.is_empty() {
        return None;
    }

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .inspect_err(|error| tracing::debug!("ignoring {field} filter {raw:?}: {error}"))
        .ok()
}

fn parse_field<T>(field: &str, raw: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = raw.trim();

    if raw.is_empty() {
        return None;
    }

    raw.parse()
        .inspect_err(|error| tracing::debug!("ignoring {field} filter {raw:?}: {error}"))
        .ok()
}
