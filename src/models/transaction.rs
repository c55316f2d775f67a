//! This file defines the type `Transaction`, the core type of the ledger, and
//! the types used to create and edit transactions.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, Weekday};

use crate::{
    Error,
    models::{TransactionType, TransactionTypeId},
};

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// The largest amount a single transaction may have, one quadrillion.
///
/// Far below [Decimal::MAX], so totals over any realistic history stay exact.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Whether the money for a transaction has actually moved yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Recorded but not yet settled.
    Pending,
    /// Settled.
    Completed,
}

impl TransactionStatus {
    /// The code stored in the database.
    pub fn code(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            _ => Err(Error::InvalidStatus(s.to_owned())),
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The Vietnamese name of the day of the week that `date` falls on.
pub fn weekday_label(date: Date) -> &'static str {
    match date.weekday() {
        Weekday::Sunday => "Chủ Nhật",
        Weekday::Monday => "Thứ Hai",
        Weekday::Tuesday => "Thứ Ba",
        Weekday::Wednesday => "Thứ Tư",
        Weekday::Thursday => "Thứ Năm",
        Weekday::Friday => "Thứ Sáu",
        Weekday::Saturday => "Thứ Bảy",
    }
}

/// An income or expense, i.e. an event where money was either earned or spent.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID assigned by the store.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: Date,
    /// The day of the week of `date`, see [weekday_label].
    pub weekday_label: String,
    /// The amount of money earned or spent. Never negative, the direction
    /// comes from `category.kind`.
    pub amount: Decimal,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Whether the transaction has settled.
    pub status: TransactionStatus,
    /// A copy of the transaction type taken when the transaction was created
    /// or last edited.
    ///
    /// Later edits to the transaction type are not reflected here.
    pub category: TransactionType,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [NewTransaction] for discoverability. The status defaults
    /// to [TransactionStatus::Pending].
    pub fn build(
        amount: Decimal,
        date: Date,
        description: &str,
        category: TransactionType,
    ) -> NewTransaction {
        NewTransaction {
            date,
            amount,
            description: description.to_owned(),
            status: TransactionStatus::Pending,
            category,
        }
    }

    /// Apply a partial edit to the transaction.
    ///
    /// `category` replaces the embedded transaction type when it is `Some`;
    /// callers resolve `changes.category_id` to a fresh copy of the type.
    /// Changing the date also updates the weekday label.
    pub fn apply(&mut self, changes: TransactionChanges, category: Option<TransactionType>) {
        if let Some(date) = changes.date {
            self.date = date;
            self.weekday_label = weekday_label(date).to_owned();
        }

        if let Some(amount) = changes.amount {
            self.amount = amount;
        }

        if let Some(description) = changes.description {
            self.description = description;
        }

        if let Some(status) = changes.status {
            self.status = status;
        }

        if let Some(category) = category {
            self.category = category;
        }
    }
}

/// A transaction that has not been stored yet.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use time::macros::date;
///
/// use thu_chi::models::{
///     Transaction, TransactionKind, TransactionStatus, TransactionType, TransactionTypeName,
/// };
///
/// let salary = TransactionType {
///     id: 1,
///     name: TransactionTypeName::new_unchecked("Salary"),
///     kind: TransactionKind::Income,
/// };
///
/// let new_transaction = Transaction::build(
///         Decimal::from(15_000_000),
///         date!(2025 - 01 - 15),
///         "January salary",
///         salary,
///     )
///     .status(TransactionStatus::Completed);
///
/// assert_eq!(new_transaction.weekday_label(), "Thứ Tư");
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct NewTransaction {
    /// The date when the transaction occurred.
    pub date: Date,

    /// The monetary amount of the transaction, must not be negative.
    pub amount: Decimal,

    /// A human-readable description of the transaction.
    pub description: String,

    /// Whether the transaction has settled.
    pub status: TransactionStatus,

    /// The transaction type to copy into the stored transaction.
    pub category: TransactionType,
}

impl NewTransaction {
    /// Set the status of the transaction.
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// The weekday label the stored transaction will carry.
    pub fn weekday_label(&self) -> &'static str {
        weekday_label(self.date)
    }

    /// Check the amount and description.
    ///
    /// # Errors
    /// Returns [Error::NegativeAmount], [Error::AmountTooLarge] or
    /// [Error::EmptyField].
    pub fn validate(&self) -> Result<(), Error> {
        validate_amount(self.amount)?;
        validate_description(&self.description)
    }
}

/// A partial edit of a transaction. `None` leaves the field unchanged.
///
/// The category is given as an ID so the service layer can take a fresh
/// snapshot of the transaction type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionChanges {
    /// The new date. The weekday label follows it.
    pub date: Option<Date>,
    /// The new amount.
    pub amount: Option<Decimal>,
    /// The new description.
    pub description: Option<String>,
    /// The new status.
    pub status: Option<TransactionStatus>,
    /// The ID of the new transaction type.
    pub category_id: Option<TransactionTypeId>,
}

impl TransactionChanges {
    /// Check the fields that are present.
    ///
    /// # Errors
    /// Returns [Error::NegativeAmount], [Error::AmountTooLarge] or
    /// [Error::EmptyField].
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(amount) = self.amount {
            validate_amount(amount)?;
        }

        if let Some(description) = &self.description {
            validate_description(description)?;
        }

        Ok(())
    }
}

fn validate_amount(amount: Decimal) -> Result<(), Error> {
    if amount < Decimal::ZERO {
        Err(Error::NegativeAmount(amount))
    } else if amount > MAX_AMOUNT {
        Err(Error::AmountTooLarge(amount))
    } else {
        Ok(())
    }
}

fn validate_description(description: &str) -> Result<(), Error> {
    if description.trim().is_empty() {
        Err(Error::EmptyField("description"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Error,
        models::{
            MAX_AMOUNT, Transaction, TransactionChanges, TransactionKind, TransactionStatus,
            TransactionType, TransactionTypeName, weekday_label,
        },
    };

    fn groceries() -> TransactionType {
        TransactionType {
            id: 1,
            name: TransactionTypeName::new_unchecked("Groceries"),
            kind: TransactionKind::Expense,
        }
    }

    #[test]
    fn weekday_labels_are_vietnamese() {
        assert_eq!(weekday_label(date!(2024 - 01 - 07)), "Chủ Nhật");
        assert_eq!(weekday_label(date!(2024 - 01 - 08)), "Thứ Hai");
        assert_eq!(weekday_label(date!(2024 - 01 - 13)), "Thứ Bảy");
    }

    #[test]
    fn build_defaults_to_pending() {
        let new_transaction =
            Transaction::build(Decimal::from(40), date!(2024 - 01 - 10), "Rau", groceries());

        assert_eq!(new_transaction.status, TransactionStatus::Pending);
    }

    #[test]
    fn validate_rejects_negative_amount() {
        let amount = Decimal::new(-150, 2);
        let new_transaction =
            Transaction::build(amount, date!(2024 - 01 - 10), "Rau", groceries());

        assert_eq!(new_transaction.validate(), Err(Error::NegativeAmount(amount)));
    }

    #[test]
    fn validate_rejects_amount_above_maximum() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_000_i64));

        let at_maximum =
            Transaction::build(MAX_AMOUNT, date!(2024 - 01 - 10), "Nhà", groceries());
        let too_large =
            Transaction::build(Decimal::MAX, date!(2024 - 01 - 10), "Nhà", groceries());
        let edit = TransactionChanges {
            amount: Some(MAX_AMOUNT + Decimal::new(1, 2)),
            ..Default::default()
        };

        assert_eq!(at_maximum.validate(), Ok(()));
        assert_eq!(too_large.validate(), Err(Error::AmountTooLarge(Decimal::MAX)));
        assert_eq!(
            edit.validate(),
            Err(Error::AmountTooLarge(MAX_AMOUNT + Decimal::new(1, 2)))
        );
    }

    #[test]
    fn validate_accepts_zero_amount() {
        let new_transaction =
            Transaction::build(Decimal::ZERO, date!(2024 - 01 - 10), "Rau", groceries());

        assert_eq!(new_transaction.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_blank_description() {
        let new_transaction =
            Transaction::build(Decimal::from(1), date!(2024 - 01 - 10), "  ", groceries());

        assert_eq!(
            new_transaction.validate(),
            Err(Error::EmptyField("description"))
        );
    }

    #[test]
    fn changes_only_validate_present_fields() {
        let changes = TransactionChanges {
            status: Some(TransactionStatus::Completed),
            ..Default::default()
        };

        assert_eq!(changes.validate(), Ok(()));

        let changes = TransactionChanges {
            description: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(changes.validate(), Err(Error::EmptyField("description")));
    }

    #[test]
    fn apply_updates_weekday_with_date() {
        let mut transaction = Transaction {
            id: 1,
            date: date!(2024 - 01 - 08),
            weekday_label: weekday_label(date!(2024 - 01 - 08)).to_owned(),
            amount: Decimal::from(40),
            description: "Rau".to_owned(),
            status: TransactionStatus::Pending,
            category: groceries(),
        };

        transaction.apply(
            TransactionChanges {
                date: Some(date!(2024 - 01 - 07)),
                status: Some(TransactionStatus::Completed),
                ..Default::default()
            },
            None,
        );

        assert_eq!(transaction.date, date!(2024 - 01 - 07));
        assert_eq!(transaction.weekday_label, "Chủ Nhật");
        assert_eq!(transaction.status, TransactionStatus::Completed);
        assert_eq!(transaction.amount, Decimal::from(40));
        assert_eq!(transaction.category, groceries());
    }

    #[test]
    fn status_parses_codes() {
        assert_eq!(
            "Completed".parse::<TransactionStatus>(),
            Ok(TransactionStatus::Completed)
        );
        assert_eq!(
            "done".parse::<TransactionStatus>(),
            Err(Error::InvalidStatus("done".to_owned()))
        );
    }
}
