//! Account passwords.
//!
//! A plain text password is first checked for strength as a
//! [ValidatedPassword], and only then salted and hashed into a
//! [PasswordHash] that can be stored.

use std::fmt::Display;

use bcrypt::BcryptError;
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, zxcvbn};

use crate::Error;

/// A plain text password that is strong enough to be hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `raw_password`.
    ///
    /// `user_inputs` are details of the account, such as the username and
    /// display name. A password built from them is rated weaker.
    ///
    /// # Errors
    ///
    /// This function will return:
    /// - [Error::EmptyField] if the password is blank,
    /// - [Error::TooWeak] if the strength estimate is below three out of
    ///   four. The message carries the estimator's advice.
    pub fn new(raw_password: &str, user_inputs: &[&str]) -> Result<Self, Error> {
        if raw_password.trim().is_empty() {
            return Err(Error::EmptyField("password"));
        }

        let entropy = zxcvbn(raw_password, user_inputs);

        if let Score::Three | Score::Four = entropy.score() {
            return Ok(Self(raw_password.to_owned()));
        }

        let advice = entropy
            .feedback()
            .map(ToString::to_string)
            .filter(|advice| !advice.trim().is_empty())
            .unwrap_or_else(|| "add more words or characters".to_owned());

        Err(Error::TooWeak(advice))
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("********")
    }
}

/// A salted bcrypt hash of a [ValidatedPassword].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The bcrypt cost used unless configured otherwise.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with a fresh salt.
    ///
    /// Each step of `cost` doubles the time taken to hash and verify. Tests
    /// use the minimum of 4.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if `cost` is out of range or bcrypt fails.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        bcrypt::hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash read back from the store.
    ///
    /// The string is not checked, a malformed hash makes [PasswordHash::verify]
    /// fail.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_owned())
    }

    /// Whether `raw_password` hashes to this value.
    ///
    /// The comparison runs in constant time.
    pub fn verify(&self, raw_password: &str) -> Result<bool, BcryptError> {
        bcrypt::verify(raw_password, &self.0)
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
