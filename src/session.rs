//! The logged in user, passed explicitly to every mutating operation.

use time::OffsetDateTime;

use crate::models::{Account, AccountId};

/// Proof that a user has authenticated.
///
/// A session is only created by [Ledger::log_in](crate::Ledger::log_in), and
/// its username is what the activity log attributes actions to.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    account_id: AccountId,
    username: String,
    display_name: String,
    logged_in_at: OffsetDateTime,
}

impl Session {
    pub(crate) fn new(account: &Account) -> Self {
        Self {
            account_id: account.id,
            username: account.username.as_ref().to_owned(),
            display_name: account.display_name.clone(),
            logged_in_at: OffsetDateTime::now_utc(),
        }
    }

    /// The ID of the logged in account.
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// The username actions are attributed to.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The name of the person who logged in.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// When the session was created, in UTC.
    pub fn logged_in_at(&self) -> OffsetDateTime {
        self.logged_in_at
    }
}
