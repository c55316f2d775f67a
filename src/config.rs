//! Tunable settings for the ledger service.

use crate::models::PasswordHash;

/// Settings that change how the [Ledger](crate::Ledger) behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerConfig {
    /// The bcrypt cost used when hashing new passwords.
    ///
    /// Tests use a low cost to keep them fast.
    pub password_cost: u32,
    /// How many transactions the dashboard lists as "recent".
    pub recent_transaction_count: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            password_cost: PasswordHash::DEFAULT_COST,
            recent_transaction_count: 5,
        }
    }
}
