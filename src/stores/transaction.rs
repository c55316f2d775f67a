//! Defines the transaction store trait.

use crate::{
    Error,
    models::{NewTransaction, Transaction, TransactionId},
};

/// Handles the creation, retrieval, editing and deletion of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    fn create(&self, new_transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Create many transactions at once.
    ///
    /// Implementers should store either all of the transactions or none of them.
    fn create_many(
        &self,
        new_transactions: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, Error>;

    /// Retrieve a transaction from the store.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error>;

    /// Retrieve every transaction in the order they were stored.
    fn get_all(&self) -> Result<Vec<Transaction>, Error>;

    /// Replace the stored transaction that has the same ID as `transaction`.
    fn replace(&self, transaction: &Transaction) -> Result<(), Error>;

    /// Delete the transaction with `id`.
    fn delete(&self, id: TransactionId) -> Result<(), Error>;
}
