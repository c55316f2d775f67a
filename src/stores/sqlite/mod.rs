//! SQLite implementations of the record stores.
//!
//! All stores share one connection behind an `Arc<Mutex<_>>`, so they can be
//! cloned into background tasks.

mod account;
mod activity;
mod transaction;
mod transaction_type;

pub use account::SQLiteAccountStore;
pub use activity::SQLiteActivityStore;
pub use transaction::SQLiteTransactionStore;
pub use transaction_type::SQLiteTransactionTypeStore;

use std::{
    str::FromStr,
    sync::{Mutex, MutexGuard},
};

use rusqlite::{Connection, Row, types::Type};

use crate::Error;

/// Acquire the shared connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned.
pub(crate) fn lock(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)
}

/// Read a TEXT column and parse it with [FromStr].
///
/// Parse failures are reported as a column conversion failure, the same way
/// rusqlite reports a bad value for its built-in types.
pub(crate) fn parse_column<T>(row: &Row, index: usize) -> Result<T, rusqlite::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(index)?;

    raw.parse()
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}
