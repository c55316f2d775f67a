//! Thu chi is a small household ledger for recording income ("thu") and
//! expenses ("chi").
//!
//! Users authenticate, then create, edit, filter and summarise transactions,
//! manage the transaction types used to label them, manage user accounts, and
//! have every change recorded to an activity log.
//!
//! The library is split into:
//! - [models]: the domain types,
//! - [stores]: the record store traits and their SQLite implementations,
//! - [query]: the stateless filtering and statistics engine,
//! - [Ledger]: the service boundary that validates input, talks to the stores
//!   and records activity.

#![warn(missing_docs)]

mod activity;
mod config;
mod ledger;
mod logging;
mod session;

pub mod db;
pub mod models;
pub mod query;
pub mod stores;

pub use activity::ActivityLog;
pub use config::LedgerConfig;
pub use db::initialize as initialize_db;
pub use ledger::{Dashboard, Ledger, SQLiteLedger, Snapshot, create_sqlite_ledger};
pub use logging::setup_logging;
pub use session::Session;

use rust_decimal::Decimal;

use crate::models::{AccountId, TransactionId, TransactionTypeId};

/// The broad class of an [Error], used by front ends to decide how to
/// present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The input was rejected before any store call was made.
    Validation,
    /// The input clashes with existing data, e.g. a username already in use.
    Conflict,
    /// The record store failed or could not find the requested record.
    Store,
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required text field was empty or only whitespace.
    ///
    /// The string names the field, e.g. "description".
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// A transaction amount was negative.
    #[error("{0} is a negative amount, which is not allowed")]
    NegativeAmount(Decimal),

    /// A transaction amount was above [models::MAX_AMOUNT].
    #[error("{0} is larger than the largest allowed amount")]
    AmountTooLarge(Decimal),

    /// The transaction type ID given for a transaction did not match a
    /// stored transaction type.
    #[error("the transaction type ID {0} does not refer to a valid transaction type")]
    InvalidTransactionType(TransactionTypeId),

    /// A string could not be parsed as a transaction kind.
    #[error("\"{0}\" is not a valid kind")]
    InvalidKind(String),

    /// A string could not be parsed as a transaction status.
    #[error("\"{0}\" is not a valid status, expected \"pending\" or \"completed\"")]
    InvalidStatus(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The first account can only be registered while no accounts exist.
    #[error("an account has already been registered")]
    AlreadyRegistered,

    /// The username is already used by another account.
    #[error("the username \"{0}\" already exists")]
    DuplicateUsername(String),

    /// The requested record was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist.
    #[error("tried to update transaction {0}, which is not in the database")]
    UpdateMissingTransaction(TransactionId),

    /// Tried to delete a transaction that does not exist.
    #[error("tried to delete transaction {0}, which is not in the database")]
    DeleteMissingTransaction(TransactionId),

    /// Tried to update a transaction type that does not exist.
    #[error("tried to update transaction type {0}, which is not in the database")]
    UpdateMissingTransactionType(TransactionTypeId),

    /// Tried to delete a transaction type that does not exist.
    #[error("tried to delete transaction type {0}, which is not in the database")]
    DeleteMissingTransactionType(TransactionTypeId),

    /// Tried to update an account that does not exist.
    #[error("tried to update account {0}, which is not in the database")]
    UpdateMissingAccount(AccountId),

    /// Tried to delete an account that does not exist.
    #[error("tried to delete account {0}, which is not in the database")]
    DeleteMissingAccount(AccountId),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A background fetch from the record store panicked or was cancelled.
    #[error("a background store task failed: {0}")]
    BackgroundTask(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl Error {
    /// Classify the error as a validation, conflict or store failure.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::EmptyField(_)
            | Error::NegativeAmount(_)
            | Error::AmountTooLarge(_)
            | Error::InvalidTransactionType(_)
            | Error::InvalidKind(_)
            | Error::InvalidStatus(_)
            | Error::TooWeak(_) => ErrorCategory::Validation,
            Error::DuplicateUsername(_) | Error::AlreadyRegistered => ErrorCategory::Conflict,
            Error::HashingError(_)
            | Error::NotFound
            | Error::UpdateMissingTransaction(_)
            | Error::DeleteMissingTransaction(_)
            | Error::UpdateMissingTransactionType(_)
            | Error::DeleteMissingTransactionType(_)
            | Error::UpdateMissingAccount(_)
            | Error::DeleteMissingAccount(_)
            | Error::DatabaseLockError
            | Error::BackgroundTask(_)
            | Error::SqlError(_) => ErrorCategory::Store,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                Some(ref desc),
            ) if desc.ends_with("account.username") => {
                // The offending username is not part of SQLite's message.
                Error::DuplicateUsername(String::new())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
