//! Implements a SQLite backed transaction type store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{
        TransactionKind, TransactionType, TransactionTypeChanges, TransactionTypeId,
        TransactionTypeName,
    },
    stores::TransactionTypeStore,
};

use super::{lock, parse_column};

/// Creates and retrieves transaction types to/from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionTypeStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionTypeStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionTypeStore for SQLiteTransactionTypeStore {
    /// Create a transaction type in the database.
    ///
    /// # Errors
    /// This function will return an error if there is an SQL error.
    fn create(
        &self,
        name: TransactionTypeName,
        kind: TransactionKind,
    ) -> Result<TransactionType, Error> {
        let connection = lock(&self.connection)?;

        connection.execute(
            "INSERT INTO transaction_type (name, kind) VALUES (?1, ?2);",
            (name.as_ref(), kind.code()),
        )?;

        let id = connection.last_insert_rowid();

        Ok(TransactionType { id, name, kind })
    }

    /// Retrieve a transaction type in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction type,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: TransactionTypeId) -> Result<TransactionType, Error> {
        lock(&self.connection)?
            .prepare("SELECT id, name, kind FROM transaction_type WHERE id = :id;")?
            .query_row(&[(":id", &id)], Self::map_row)
            .map_err(|error| error.into())
    }

    fn get_all(&self) -> Result<Vec<TransactionType>, Error> {
        lock(&self.connection)?
            .prepare("SELECT id, name, kind FROM transaction_type ORDER BY id ASC;")?
            .query_map([], Self::map_row)?
            .map(|maybe_type| maybe_type.map_err(|error| error.into()))
            .collect()
    }

    fn get_by_kind(&self, kind: TransactionKind) -> Result<Vec<TransactionType>, Error> {
        lock(&self.connection)?
            .prepare("SELECT id, name, kind FROM transaction_type WHERE kind = :kind ORDER BY id ASC;")?
            .query_map(&[(":kind", kind.code())], Self::map_row)?
            .map(|maybe_type| maybe_type.map_err(|error| error.into()))
            .collect()
    }

    /// Apply `changes` to a transaction type. Fields set to `None` are kept.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpdateMissingTransactionType] if no transaction type has `id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(
        &self,
        id: TransactionTypeId,
        changes: &TransactionTypeChanges,
    ) -> Result<(), Error> {
        let rows_affected = lock(&self.connection)?.execute(
            "UPDATE transaction_type
             SET name = COALESCE(?1, name), kind = COALESCE(?2, kind)
             WHERE id = ?3",
            (
                changes.name.as_ref().map(|name| name.as_ref()),
                changes.kind.map(|kind| kind.code()),
                id,
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingTransactionType(id));
        }

        Ok(())
    }

    /// Delete a transaction type by ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingTransactionType] if no transaction type has `id`,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&self, id: TransactionTypeId) -> Result<(), Error> {
        let rows_affected =
            lock(&self.connection)?.execute("DELETE FROM transaction_type WHERE id = ?1", [id])?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingTransactionType(id));
        }

        Ok(())
    }
}

impl CreateTable for SQLiteTransactionTypeStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS transaction_type (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('thu', 'chi'))
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionTypeStore {
    type ReturnType = TransactionType;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let raw_name: String = row.get(offset + 1)?;
        let kind = parse_column(row, offset + 2)?;

        Ok(TransactionType {
            id,
            name: TransactionTypeName::new_unchecked(&raw_name),
            kind,
        })
    }
}
