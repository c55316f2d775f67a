//! Defines the transaction type store trait.

use crate::{
    Error,
    models::{
        TransactionKind, TransactionType, TransactionTypeChanges, TransactionTypeId,
        TransactionTypeName,
    },
};

/// Creates, retrieves, edits and deletes transaction types.
pub trait TransactionTypeStore {
    /// Create a new transaction type and add it to the store.
    fn create(
        &self,
        name: TransactionTypeName,
        kind: TransactionKind,
    ) -> Result<TransactionType, Error>;

    /// Get a transaction type by its ID.
    fn get(&self, id: TransactionTypeId) -> Result<TransactionType, Error>;

    /// Get all transaction types.
    fn get_all(&self) -> Result<Vec<TransactionType>, Error>;

    /// Get the transaction types of one kind.
    fn get_by_kind(&self, kind: TransactionKind) -> Result<Vec<TransactionType>, Error>;

    /// Apply `changes` to the transaction type with `id`.
    fn update(&self, id: TransactionTypeId, changes: &TransactionTypeChanges)
    -> Result<(), Error>;

    /// Delete the transaction type with `id`.
    ///
    /// Transactions that carry a copy of the type are left untouched.
    fn delete(&self, id: TransactionTypeId) -> Result<(), Error>;
}
