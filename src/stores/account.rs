//! Defines the account store trait.

use crate::{
    Error,
    models::{Account, AccountChanges, AccountId, PasswordHash, Username},
};

/// Handles the creation, retrieval and editing of user accounts.
pub trait AccountStore {
    /// Create a new account.
    fn create(
        &self,
        username: Username,
        display_name: &str,
        password_hash: PasswordHash,
    ) -> Result<Account, Error>;

    /// Get an account by its ID.
    fn get(&self, id: AccountId) -> Result<Account, Error>;

    /// Get an account by its username.
    ///
    /// Returns `Ok(None)` if no account has the given username.
    fn get_by_username(&self, username: &str) -> Result<Option<Account>, Error>;

    /// Get all accounts.
    fn get_all(&self) -> Result<Vec<Account>, Error>;

    /// Apply `changes` to the account with `id`.
    fn update(&self, id: AccountId, changes: &AccountChanges) -> Result<(), Error>;

    /// Replace the password hash of the account with `id`.
    fn set_password(&self, id: AccountId, password_hash: PasswordHash) -> Result<(), Error>;

    /// Delete the account with `id`.
    fn delete(&self, id: AccountId) -> Result<(), Error>;

    /// Get the number of accounts.
    fn count(&self) -> Result<usize, Error>;
}
