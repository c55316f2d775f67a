//! This module defines the domain data types.

pub use account::{Account, AccountChanges, AccountId, NewAccount, Username};
pub use activity::{ActivityId, ActivityKind, ActivityRecord, NewActivity};
pub use password::{PasswordHash, ValidatedPassword};
pub use transaction::{
    MAX_AMOUNT, NewTransaction, Transaction, TransactionChanges, TransactionId, TransactionStatus,
    weekday_label,
};
pub use transaction_type::{
    TransactionKind, TransactionType, TransactionTypeChanges, TransactionTypeId,
    TransactionTypeName,
};

pub(crate) use account::validate_display_name;

mod account;
mod activity;
mod password;
mod transaction;
mod transaction_type;
