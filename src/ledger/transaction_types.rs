//! Transaction type operations.

use crate::{
    Error, Session,
    models::{
        ActivityKind, TransactionKind, TransactionType, TransactionTypeChanges, TransactionTypeId,
        TransactionTypeName,
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
    /// Every transaction type in the order it was stored.
    pub fn list_transaction_types(&self) -> Result<Vec<TransactionType>, Error> {
        self.transaction_type_store.get_all()
    }

    /// The transaction types of one kind, e.g. for an income-only picker.
    pub fn list_transaction_types_by_kind(
        &self,
        kind: TransactionKind,
    ) -> Result<Vec<TransactionType>, Error> {
        self.transaction_type_store.get_by_kind(kind)
    }

    /// Get a transaction type by its ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no transaction type with `id`.
    pub fn get_transaction_type(&self, id: TransactionTypeId) -> Result<TransactionType, Error> {
        self.transaction_type_store.get(id)
    }

    /// Create a transaction type.
    ///
    /// # Errors
    /// Returns a store error if the transaction type could not be saved.
    pub fn create_transaction_type(
        &self,
        session: &Session,
        name: TransactionTypeName,
        kind: TransactionKind,
    ) -> Result<TransactionType, Error> {
        let transaction_type = self.transaction_type_store.create(name, kind)?;

        tracing::info!(
            "{} created transaction type {}",
            session.username(),
            transaction_type.id
        );
        self.activity_log.record(
            session.username(),
            ActivityKind::Create,
            format!(
                "Created transaction type {} - {}",
                transaction_type.name,
                transaction_type.kind.code()
            ),
        );

        Ok(transaction_type)
    }

    /// Rename a transaction type or change its kind.
    ///
    /// Transactions already stored keep their copy of the old values.
    ///
    /// # Errors
    /// Returns [Error::UpdateMissingTransactionType] if there is no
    /// transaction type with `id`.
    pub fn update_transaction_type(
        &self,
        session: &Session,
        id: TransactionTypeId,
        changes: TransactionTypeChanges,
    ) -> Result<TransactionType, Error> {
        self.transaction_type_store.update(id, &changes)?;
        let transaction_type = self.transaction_type_store.get(id)?;

        tracing::info!("{} updated transaction type {id}", session.username());
        self.activity_log.record(
            session.username(),
            ActivityKind::Update,
            format!("Updated transaction type ID: {id}"),
        );

        Ok(transaction_type)
    }

    /// Delete a transaction type.
    ///
    /// Transactions that use the type are not checked or changed.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransactionType] if there is no
    /// transaction type with `id`.
    pub fn delete_transaction_type(
        &self,
        session: &Session,
        id: TransactionTypeId,
    ) -> Result<(), Error> {
        self.transaction_type_store.delete(id)?;

        tracing::info!("{} deleted transaction type {id}", session.username());
        self.activity_log.record(
            session.username(),
            ActivityKind::Delete,
            format!("Deleted transaction type ID: {id}"),
        );

        Ok(())
    }
}

#[cfg(test)]
mod transaction_type_tests {
    use crate::{
        Error,
        ledger::test_utils::get_logged_in_ledger,
        models::{ActivityKind, TransactionKind, TransactionTypeChanges, TransactionTypeName},
    };

    #[test]
    fn create_and_list_by_kind() {
        let (ledger, session) = get_logged_in_ledger();

        let salary = ledger
            .create_transaction_type(
                &session,
                TransactionTypeName::new("Lương").unwrap(),
                TransactionKind::Income,
            )
            .unwrap();
        let food = ledger
            .create_transaction_type(
                &session,
                TransactionTypeName::new("Ăn uống").unwrap(),
                TransactionKind::Expense,
            )
            .unwrap();

        assert_eq!(
            ledger.list_transaction_types(),
            Ok(vec![salary.clone(), food.clone()])
        );
        assert_eq!(
            ledger.list_transaction_types_by_kind(TransactionKind::Income),
            Ok(vec![salary])
        );
        assert_eq!(ledger.get_transaction_type(food.id), Ok(food));

        let latest = &ledger.activity_by_kind(ActivityKind::Create).unwrap()[0];
        assert_eq!(latest.description, "Created transaction type Ăn uống - chi");
    }

    #[test]
    fn update_returns_edited_type() {
        let (ledger, session) = get_logged_in_ledger();
        let created = ledger
            .create_transaction_type(
                &session,
                TransactionTypeName::new_unchecked("Lương"),
                TransactionKind::Income,
            )
            .unwrap();

        let updated = ledger
            .update_transaction_type(
                &session,
                created.id,
                TransactionTypeChanges {
                    name: None,
                    kind: Some(TransactionKind::Expense),
                },
            )
            .unwrap();

        assert_eq!(updated.name, created.name);
        assert_eq!(updated.kind, TransactionKind::Expense);
        assert_eq!(ledger.activity_by_kind(ActivityKind::Update).unwrap().len(), 1);
    }

    #[test]
    fn update_and_delete_missing_type_fail() {
        let (ledger, session) = get_logged_in_ledger();

        assert_eq!(
            ledger.update_transaction_type(&session, 4, TransactionTypeChanges::default()),
            Err(Error::UpdateMissingTransactionType(4))
        );
        assert_eq!(
            ledger.delete_transaction_type(&session, 4),
            Err(Error::DeleteMissingTransactionType(4))
        );
        assert!(ledger.activity_by_kind(ActivityKind::Delete).unwrap().is_empty());
    }
}
