//! Transaction types label each transaction as a kind of income or expense,
//! e.g. 'Salary' (thu) or 'Groceries' (chi).

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Database identifier for a transaction type.
pub type TransactionTypeId = i64;

/// Whether money flows in or out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Money earned ("thu").
    #[serde(rename = "thu")]
    Income,
    /// Money spent ("chi").
    #[serde(rename = "chi")]
    Expense,
}

impl TransactionKind {
    /// The short code stored in the database.
    pub fn code(&self) -> &'static str {
        match self {
            TransactionKind::Income => "thu",
            TransactionKind::Expense => "chi",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    /// Accepts "thu"/"income" and "chi"/"expense", ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "thu" | "income" => Ok(TransactionKind::Income),
            "chi" | "expense" => Ok(TransactionKind::Expense),
            _ => Err(Error::InvalidKind(s.to_owned())),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "Income"),
            TransactionKind::Expense => write!(f, "Expense"),
        }
    }
}

/// A validated, non-empty transaction type name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct TransactionTypeName(String);

impl TransactionTypeName {
    /// Create a transaction type name.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyField] if `name` is empty
    /// or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyField("name"))
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a transaction type name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for TransactionTypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for TransactionTypeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionTypeName::new(s)
    }
}

impl Display for TransactionTypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user-defined label that marks transactions as income or expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct TransactionType {
    /// The ID assigned by the store.
    pub id: TransactionTypeId,
    /// The display name, e.g. "Groceries".
    pub name: TransactionTypeName,
    /// Whether transactions of this type are income or expenses.
    pub kind: TransactionKind,
}

/// A partial edit of a transaction type. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionTypeChanges {
    /// The new name.
    pub name: Option<TransactionTypeName>,
    /// The new kind.
    pub kind: Option<TransactionKind>,
}

#[cfg(test)]
mod transaction_type_name_tests {
    use crate::{Error, models::TransactionTypeName};

    #[test]
    fn new_fails_on_empty_string() {
        let name = TransactionTypeName::new("");

        assert_eq!(name, Err(Error::EmptyField("name")));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let name = TransactionTypeName::new("\n\t \r");

        assert_eq!(name, Err(Error::EmptyField("name")));
    }

    #[test]
    fn new_trims_surrounding_whitespace() {
        let name = TransactionTypeName::new("  Lương  ").unwrap();

        assert_eq!(name.as_ref(), "Lương");
    }
}

#[cfg(test)]
mod transaction_kind_tests {
    use crate::{Error, models::TransactionKind};

    #[test]
    fn parses_vietnamese_and_english_codes() {
        assert_eq!("thu".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!("Income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!("CHI".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert_eq!("expense".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
    }

    #[test]
    fn rejects_unknown_kind() {
        let kind = "transfer".parse::<TransactionKind>();

        assert_eq!(kind, Err(Error::InvalidKind("transfer".to_owned())));
    }

    #[test]
    fn serializes_as_code() {
        let json = serde_json::to_string(&TransactionKind::Expense).unwrap();

        assert_eq!(json, "\"chi\"");
    }
}
