//! Implements a SQLite backed account store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{Account, AccountChanges, AccountId, PasswordHash, Username},
    stores::AccountStore,
};

use super::lock;

/// Creates, retrieves and edits user accounts in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteAccountStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteAccountStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

/// Fill in the username that SQLite leaves out of unique constraint errors.
fn with_username(error: rusqlite::Error, username: &str) -> Error {
    match Error::from(error) {
        Error::DuplicateUsername(_) => Error::DuplicateUsername(username.to_owned()),
        error => error,
    }
}

impl AccountStore for SQLiteAccountStore {
    /// Create a new account in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateUsername] if `username` is already in use,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(
        &self,
        username: Username,
        display_name: &str,
        password_hash: PasswordHash,
    ) -> Result<Account, Error> {
        let connection = lock(&self.connection)?;

        connection
            .execute(
                "INSERT INTO account (username, display_name, password) VALUES (?1, ?2, ?3)",
                (username.as_ref(), display_name, password_hash.as_ref()),
            )
            .map_err(|error| with_username(error, username.as_ref()))?;

        let id = AccountId::new(connection.last_insert_rowid());

        Ok(Account {
            id,
            username,
            display_name: display_name.to_owned(),
            password_hash,
        })
    }

    /// Get the account with `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no account has the ID,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, id: AccountId) -> Result<Account, Error> {
        lock(&self.connection)?
            .prepare("SELECT id, username, display_name, password FROM account WHERE id = :id")?
            .query_row(&[(":id", &id.as_i64())], Self::map_row)
            .map_err(|error| error.into())
    }

    fn get_by_username(&self, username: &str) -> Result<Option<Account>, Error> {
        let result = lock(&self.connection)?
            .prepare(
                "SELECT id, username, display_name, password FROM account WHERE username = :username",
            )?
            .query_row(&[(":username", username.trim())], Self::map_row);

        match result {
            Ok(account) => Ok(Some(account)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn get_all(&self) -> Result<Vec<Account>, Error> {
        lock(&self.connection)?
            .prepare("SELECT id, username, display_name, password FROM account ORDER BY id ASC")?
            .query_map([], Self::map_row)?
            .map(|maybe_account| maybe_account.map_err(|error| error.into()))
            .collect()
    }

    /// Apply `changes` to the account with `id`. Fields set to `None` are kept.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateUsername] if the new username belongs to another account,
    /// - [Error::UpdateMissingAccount] if no account has the ID,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn update(&self, id: AccountId, changes: &AccountChanges) -> Result<(), Error> {
        let new_username = changes.username.as_ref().map(|username| username.as_ref());

        let rows_affected = lock(&self.connection)?
            .execute(
                "UPDATE account
                 SET username = COALESCE(?1, username),
                     display_name = COALESCE(?2, display_name)
                 WHERE id = ?3",
                (new_username, changes.display_name.as_deref(), id.as_i64()),
            )
            .map_err(|error| with_username(error, new_username.unwrap_or_default()))?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingAccount(id));
        }

        Ok(())
    }

    /// Overwrite the stored password hash.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpdateMissingAccount] if no account has the ID,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn set_password(&self, id: AccountId, password_hash: PasswordHash) -> Result<(), Error> {
        let rows_affected = lock(&self.connection)?.execute(
            "UPDATE account SET password = ?1 WHERE id = ?2",
            (password_hash.as_ref(), id.as_i64()),
        )?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingAccount(id));
        }

        Ok(())
    }

    fn delete(&self, id: AccountId) -> Result<(), Error> {
        let rows_affected =
            lock(&self.connection)?.execute("DELETE FROM account WHERE id = ?1", [id.as_i64()])?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingAccount(id));
        }

        Ok(())
    }

    fn count(&self) -> Result<usize, Error> {
        lock(&self.connection)?
            .query_row("SELECT COUNT(id) FROM account;", [], |row| row.get::<_, i64>(0))
            .map(|count| count as usize)
            .map_err(|error| error.into())
    }
}

impl CreateTable for SQLiteAccountStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS account (
                id INTEGER PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                display_name TEXT NOT NULL,
                password TEXT NOT NULL
            )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteAccountStore {
    type ReturnType = Account;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_id = row.get(offset)?;
        let raw_username: String = row.get(offset + 1)?;
        let display_name = row.get(offset + 2)?;
        let raw_password_hash: String = row.get(offset + 3)?;

        Ok(Account {
            id: AccountId::new(raw_id),
            username: Username::new_unchecked(&raw_username),
            display_name,
            password_hash: PasswordHash::new_unchecked(&raw_password_hash),
        })
    }
}
