//! Account, authentication and activity log operations.

use crate::{
    Error, Session,
    models::{
        Account, AccountChanges, AccountId, ActivityKind, ActivityRecord, NewAccount,
        PasswordHash, Username, ValidatedPassword, validate_display_name,
    },
    stores::{AccountStore, ActivityStore, TransactionStore, TransactionTypeStore},
};

use super::Ledger;

impl<T, Y, A, H> Ledger<T, Y, A, H>
where
    T: TransactionStore,
    Y: TransactionTypeStore,
    A: AccountStore,
    H: ActivityStore,
{
    /// Create the first account of a new ledger.
    ///
    /// No session is needed, so this only works while there are no accounts.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::AlreadyRegistered] if any account exists,
    /// - [Error::EmptyField] if the username or display name is blank,
    /// - [Error::TooWeak] if the password is too easy to guess,
    /// - or a store error if the account could not be saved.
    pub fn register_first_account(&self, new_account: NewAccount) -> Result<Account, Error> {
        if self.account_store.count()? > 0 {
            return Err(Error::AlreadyRegistered);
        }

        let account = self.insert_account(new_account)?;

        tracing::info!("registered first account {}", account.username);
        self.activity_log.record(
            account.username.as_ref(),
            ActivityKind::Create,
            format!("Created account {}", account.username),
        );

        Ok(account)
    }

    /// Create an account for another user.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyField] if the username or display name is blank,
    /// - [Error::DuplicateUsername] if the username is in use,
    /// - [Error::TooWeak] if the password is too easy to guess,
    /// - or a store error if the account could not be saved.
    pub fn create_account(
        &self,
        session: &Session,
        new_account: NewAccount,
    ) -> Result<Account, Error> {
        let account = self.insert_account(new_account)?;

        tracing::info!("{} created account {}", session.username(), account.username);
        self.activity_log.record(
            session.username(),
            ActivityKind::Create,
            format!("Created account {}", account.username),
        );

        Ok(account)
    }

    /// Change the username or display name of an account.
    ///
    /// An account may keep its own username; it only conflicts with other
    /// accounts.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyField] if the new display name is blank,
    /// - [Error::DuplicateUsername] if another account has the new username,
    /// - [Error::UpdateMissingAccount] if there is no account with `id`,
    /// - or a store error if the account could not be saved.
    pub fn update_account(
        &self,
        session: &Session,
        id: AccountId,
        mut changes: AccountChanges,
    ) -> Result<Account, Error> {
        changes.display_name = changes
            .display_name
            .as_deref()
            .map(validate_display_name)
            .transpose()?;

        if let Some(username) = &changes.username {
            self.ensure_username_free(username, Some(id))?;
        }

        self.account_store.update(id, &changes)?;
        let account = self.account_store.get(id)?;

        tracing::info!("{} updated account {id}", session.username());
        self.activity_log.record(
            session.username(),
            ActivityKind::Update,
            format!("Updated account {}", account.username),
        );

        Ok(account)
    }

    /// Set a new password for an account.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::TooWeak] if the password is too easy to guess,
    /// - [Error::NotFound] if there is no account with `id`,
    /// - or a store error if the password could not be saved.
    pub fn change_password(
        &self,
        session: &Session,
        id: AccountId,
        new_password: &str,
    ) -> Result<(), Error> {
        let account = self.account_store.get(id)?;
        let password = ValidatedPassword::new(
            new_password,
            &[account.username.as_ref(), &account.display_name],
        )?;
        let password_hash = PasswordHash::new(password, self.config.password_cost)?;

        self.account_store.set_password(id, password_hash)?;

        tracing::info!("{} changed the password of account {id}", session.username());
        self.activity_log.record(
            session.username(),
            ActivityKind::Update,
            format!("Changed password for account ID: {id}"),
        );

        Ok(())
    }

    /// Delete an account.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingAccount] if there is no account with `id`.
    pub fn delete_account(&self, session: &Session, id: AccountId) -> Result<(), Error> {
        self.account_store.delete(id)?;

        tracing::info!("{} deleted account {id}", session.username());
        self.activity_log.record(
            session.username(),
            ActivityKind::Delete,
            format!("Deleted account ID: {id}"),
        );

        Ok(())
    }

    /// Every account in the order it was created.
    pub fn list_accounts(&self) -> Result<Vec<Account>, Error> {
        self.account_store.get_all()
    }

    /// Find an account by its username.
    pub fn get_account_by_username(&self, username: &str) -> Result<Option<Account>, Error> {
        self.account_store.get_by_username(username)
    }

    /// Check a username and password.
    ///
    /// Returns `Ok(None)` for an unknown username or a wrong password. A
    /// successful check is recorded as a login.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if the stored hash is malformed, or a
    /// store error if the account could not be fetched.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<Account>, Error> {
        let Some(account) = self.account_store.get_by_username(username)? else {
            tracing::debug!("log in attempt for unknown user {username:?}");
            return Ok(None);
        };

        let is_match = account
            .password_hash
            .verify(password)
            .map_err(|error| Error::HashingError(error.to_string()))?;

        if !is_match {
            tracing::debug!("wrong password for {}", account.username);
            return Ok(None);
        }

        tracing::info!("{} logged in", account.username);
        self.activity_log.record(
            account.username.as_ref(),
            ActivityKind::Login,
            "Logged in",
        );

        Ok(Some(account))
    }

    /// [Ledger::authenticate] and start a [Session] on success.
    ///
    /// # Errors
    /// See [Ledger::authenticate].
    pub fn log_in(&self, username: &str, password: &str) -> Result<Option<Session>, Error> {
        Ok(self
            .authenticate(username, password)?
            .map(|account| Session::new(&account)))
    }

    /// Every activity record, newest first.
    pub fn list_activity(&self) -> Result<Vec<ActivityRecord>, Error> {
        self.activity_log.store().get_all()
    }

    /// The activity records of one user, newest first.
    pub fn activity_by_username(&self, username: &str) -> Result<Vec<ActivityRecord>, Error> {
        self.activity_log.store().get_by_username(username)
    }

    /// The activity records of one kind, newest first.
    pub fn activity_by_kind(&self, kind: ActivityKind) -> Result<Vec<ActivityRecord>, Error> {
        self.activity_log.store().get_by_kind(kind)
    }

    fn insert_account(&self, new_account: NewAccount) -> Result<Account, Error> {
        let username = Username::new(&new_account.username)?;
        let display_name = validate_display_name(&new_account.display_name)?;

        self.ensure_username_free(&username, None)?;

        let password = ValidatedPassword::new(
            &new_account.password,
            &[username.as_ref(), &display_name],
        )?;
        let password_hash = PasswordHash::new(password, self.config.password_cost)?;

        self.account_store
            .create(username, &display_name, password_hash)
    }

    /// Fail if an account other than `except` already uses `username`.
    fn ensure_username_free(
        &self,
        username: &Username,
        except: Option<AccountId>,
    ) -> Result<(), Error> {
        match self.account_store.get_by_username(username.as_ref())? {
            Some(existing) if Some(existing.id) != except => {
                Err(Error::DuplicateUsername(username.to_string()))
            }
            _ => Ok(()),
        }
    }
}
