//! User accounts that can log in to the ledger.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, models::PasswordHash};

/// A newtype wrapper for integer account IDs.
///
/// This helps disambiguate account IDs from other types of IDs, leading to better compile time
/// errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct AccountId(i64);

impl AccountId {
    /// Create a new account ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the account ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A validated, non-empty username.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Username(String);

impl Username {
    /// Create a username, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyField] if `username` is blank.
    pub fn new(username: &str) -> Result<Self, Error> {
        let username = username.trim();

        if username.is_empty() {
            Err(Error::EmptyField("username"))
        } else {
            Ok(Self(username.to_owned()))
        }
    }

    /// Create a username without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(username: &str) -> Self {
        Self(username.to_owned())
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The account's ID in the application database.
    pub id: AccountId,
    /// The unique name used to log in.
    pub username: Username,
    /// The name of the person who owns the account.
    pub display_name: String,
    /// The account's password hash.
    #[serde(skip_serializing)]
    pub password_hash: PasswordHash,
}

/// The details needed to create an account, as entered by a user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewAccount {
    /// The login name.
    pub username: String,
    /// The plain text password. It is validated and hashed before storage.
    pub password: String,
    /// The name of the person who owns the account.
    pub display_name: String,
}

/// A partial edit of an account's profile. `None` leaves the field unchanged.
///
/// Passwords are changed separately.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountChanges {
    /// The new login name.
    pub username: Option<Username>,
    /// The new display name.
    pub display_name: Option<String>,
}

/// Trim `display_name` and reject it if blank.
pub(crate) fn validate_display_name(display_name: &str) -> Result<String, Error> {
    let display_name = display_name.trim();

    if display_name.is_empty() {
        Err(Error::EmptyField("display name"))
    } else {
        Ok(display_name.to_owned())
    }
}
