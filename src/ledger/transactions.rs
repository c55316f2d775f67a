//! Transaction operations.

use crate::{
    Error, Session,
    models::{
        ActivityKind, NewTransaction, Transaction, TransactionChanges, TransactionId,
        TransactionType, TransactionTypeId,
    },
    query::{FilterSpec, TransactionView},
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
    /// Every transaction in the order it was stored.
    pub fn list_transactions(&self) -> Result<Vec<Transaction>, Error> {
        self.transaction_store.get_all()
    }

    /// Get a transaction by its ID.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no transaction with `id`.
    pub fn get_transaction(&self, id: TransactionId) -> Result<Transaction, Error> {
        self.transaction_store.get(id)
    }

    /// Store a new transaction.
    ///
    /// `new_transaction.category` only has to carry the ID of an existing
    /// transaction type: the stored transaction gets a fresh copy of that type.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyField] if the description is blank,
    /// - [Error::NegativeAmount] if the amount is below zero,
    /// - [Error::InvalidTransactionType] if the transaction type does not exist,
    /// - or a store error if the transaction could not be saved.
    pub fn create_transaction(
        &self,
        session: &Session,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let new_transaction = self.prepare_transaction(new_transaction)?;
        let transaction = self.transaction_store.create(new_transaction)?;

        tracing::info!("{} created transaction {}", session.username(), transaction.id);
        self.activity_log.record(
            session.username(),
            ActivityKind::Create,
            format!(
                "Created transaction: {} - {}",
                transaction.description, transaction.amount
            ),
        );

        Ok(transaction)
    }

    /// Store several transactions at once.
    ///
    /// Every transaction is checked before any is stored, and either all of
    /// them are stored or none are. One activity entry covers the whole batch.
    ///
    /// # Errors
    /// Returns the first validation error, or a store error.
    pub fn create_transactions(
        &self,
        session: &Session,
        new_transactions: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, Error> {
        let new_transactions = new_transactions
            .into_iter()
            .map(|new_transaction| self.prepare_transaction(new_transaction))
            .collect::<Result<Vec<_>, _>>()?;

        let transactions = self.transaction_store.create_many(new_transactions)?;

        tracing::info!(
            "{} created {} transactions",
            session.username(),
            transactions.len()
        );
        self.activity_log.record(
            session.username(),
            ActivityKind::Create,
            format!("Created {} transactions", transactions.len()),
        );

        Ok(transactions)
    }

    /// Apply a partial edit to a transaction.
    ///
    /// A new `category_id` replaces the embedded transaction type with a fresh
    /// copy, and a new date also updates the weekday label.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyField] or [Error::NegativeAmount] for invalid changes,
    /// - [Error::InvalidTransactionType] if `category_id` does not exist,
    /// - [Error::NotFound] if there is no transaction with `id`,
    /// - or a store error if the transaction could not be saved.
    pub fn update_transaction(
        &self,
        session: &Session,
        id: TransactionId,
        mut changes: TransactionChanges,
    ) -> Result<Transaction, Error> {
        changes.validate()?;
        changes.description = changes
            .description
            .map(|description| description.trim().to_owned());

        let category = changes
            .category_id
            .map(|category_id| self.snapshot_type(category_id))
            .transpose()?;

        let mut transaction = self.transaction_store.get(id)?;
        transaction.apply(changes, category);
        self.transaction_store.replace(&transaction)?;

        tracing::info!("{} updated transaction {id}", session.username());
        self.activity_log.record(
            session.username(),
            ActivityKind::Update,
            format!("Updated transaction ID: {id}"),
        );

        Ok(transaction)
    }

    /// Delete a transaction.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingTransaction] if there is no transaction
    /// with `id`.
    pub fn delete_transaction(&self, session: &Session, id: TransactionId) -> Result<(), Error> {
        self.transaction_store.delete(id)?;

        tracing::info!("{} deleted transaction {id}", session.username());
        self.activity_log.record(
            session.username(),
            ActivityKind::Delete,
            format!("Deleted transaction ID: {id}"),
        );

        Ok(())
    }

    /// The transactions that match `spec`, with statistics over just those.
    ///
    /// # Errors
    /// Returns an error if the transactions cannot be fetched.
    pub fn view(&self, spec: &FilterSpec) -> Result<TransactionView, Error> {
        let transactions = self.transaction_store.get_all()?;

        Ok(TransactionView::compute(&transactions, spec))
    }

    /// Validate a new transaction and swap its category for the stored one.
    fn prepare_transaction(
        &self,
        mut new_transaction: NewTransaction,
    ) -> Result<NewTransaction, Error> {
        new_transaction.validate()?;
        new_transaction.description = new_transaction.description.trim().to_owned();
        new_transaction.category = self.snapshot_type(new_transaction.category.id)?;

        Ok(new_transaction)
    }

    fn snapshot_type(&self, id: TransactionTypeId) -> Result<TransactionType, Error> {
        match self.transaction_type_store.get(id) {
            Err(Error::NotFound) => Err(Error::InvalidTransactionType(id)),
            result => result,
        }
    }
}

#[cfg(test)]
mod transaction_tests {
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Error,
        ledger::test_utils::{create_type, get_logged_in_ledger},
        models::{
            ActivityKind, Transaction, TransactionChanges, TransactionKind, TransactionStatus,
            TransactionType, TransactionTypeChanges, TransactionTypeName,
        },
        query::FilterSpec,
    };

    #[test]
    fn create_transaction_snapshots_stored_type() {
        let (ledger, session) = get_logged_in_ledger();
        let salary = create_type(&ledger, "Lương", TransactionKind::Income);
        let stale_copy = TransactionType {
            name: TransactionTypeName::new_unchecked("Old name"),
            ..salary.clone()
        };

        let transaction = ledger
            .create_transaction(
                &session,
                Transaction::build(
                    Decimal::from(15_000_000),
                    date!(2024 - 01 - 31),
                    "  Lương tháng 1 ",
                    stale_copy,
                ),
            )
            .unwrap();

        assert_eq!(transaction.category, salary);
        assert_eq!(transaction.description, "Lương tháng 1");
        assert_eq!(transaction.weekday_label, "Thứ Tư");
        assert_eq!(transaction.status, TransactionStatus::Pending);
        assert_eq!(ledger.get_transaction(transaction.id), Ok(transaction));
    }

    #[test]
    fn create_transaction_rejects_invalid_input_before_store() {
        let (ledger, session) = get_logged_in_ledger();
        let food = create_type(&ledger, "Ăn uống", TransactionKind::Expense);

        let blank = ledger.create_transaction(
            &session,
            Transaction::build(Decimal::ONE, date!(2024 - 01 - 01), "  ", food.clone()),
        );
        let negative = ledger.create_transaction(
            &session,
            Transaction::build(Decimal::from(-5), date!(2024 - 01 - 01), "Cơm", food.clone()),
        );
        let missing_type = ledger.create_transaction(
            &session,
            Transaction::build(
                Decimal::ONE,
                date!(2024 - 01 - 01),
                "Cơm",
                TransactionType {
                    id: food.id + 100,
                    ..food
                },
            ),
        );

        assert_eq!(blank, Err(Error::EmptyField("description")));
        assert_eq!(negative, Err(Error::NegativeAmount(Decimal::from(-5))));
        assert!(matches!(
            missing_type,
            Err(Error::InvalidTransactionType(_))
        ));
        assert_eq!(ledger.list_transactions(), Ok(vec![]));
    }

    #[test]
    fn create_transaction_records_activity() {
        let (ledger, session) = get_logged_in_ledger();
        let food = create_type(&ledger, "Ăn uống", TransactionKind::Expense);

        ledger
            .create_transaction(
                &session,
                Transaction::build(Decimal::from(30), date!(2024 - 01 - 01), "Phở", food),
            )
            .unwrap();

        let creates = ledger.activity_by_kind(ActivityKind::Create).unwrap();
        // The other entry is the account registration.
        assert_eq!(creates.len(), 2);
        assert_eq!(creates[0].username, "an");
        assert_eq!(creates[0].description, "Created transaction: Phở - 30");
    }

    #[test]
    fn create_transactions_is_all_or_nothing() {
        let (ledger, session) = get_logged_in_ledger();
        let food = create_type(&ledger, "Ăn uống", TransactionKind::Expense);

        let result = ledger.create_transactions(
            &session,
            vec![
                Transaction::build(Decimal::ONE, date!(2024 - 01 - 01), "Phở", food.clone()),
                Transaction::build(Decimal::ONE, date!(2024 - 01 - 02), "", food.clone()),
            ],
        );
        assert_eq!(result, Err(Error::EmptyField("description")));
        assert_eq!(ledger.list_transactions(), Ok(vec![]));

        let created = ledger
            .create_transactions(
                &session,
                vec![
                    Transaction::build(Decimal::ONE, date!(2024 - 01 - 01), "Phở", food.clone()),
                    Transaction::build(Decimal::TWO, date!(2024 - 01 - 02), "Bún", food),
                ],
            )
            .unwrap();

        assert_eq!(ledger.list_transactions(), Ok(created));
        let creates = ledger.activity_by_kind(ActivityKind::Create).unwrap();
        // The other entry is the account registration.
        assert_eq!(creates.len(), 2);
        assert_eq!(creates[0].description, "Created 2 transactions");
    }

    #[test]
    fn update_transaction_applies_partial_changes() {
        let (ledger, session) = get_logged_in_ledger();
        let food = create_type(&ledger, "Ăn uống", TransactionKind::Expense);
        let salary = create_type(&ledger, "Lương", TransactionKind::Income);
        let created = ledger
            .create_transaction(
                &session,
                Transaction::build(Decimal::from(30), date!(2024 - 01 - 01), "Phở", food),
            )
            .unwrap();

        let updated = ledger
            .update_transaction(
                &session,
                created.id,
                TransactionChanges {
                    date: Some(date!(2024 - 01 - 06)),
                    status: Some(TransactionStatus::Completed),
                    category_id: Some(salary.id),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.amount, Decimal::from(30));
        assert_eq!(updated.description, "Phở");
        assert_eq!(updated.weekday_label, "Thứ Bảy");
        assert_eq!(updated.status, TransactionStatus::Completed);
        assert_eq!(updated.category, salary);
        assert_eq!(ledger.get_transaction(created.id), Ok(updated));
        assert_eq!(ledger.activity_by_kind(ActivityKind::Update).unwrap().len(), 1);
    }

    #[test]
    fn update_transaction_trims_description() {
        let (ledger, session) = get_logged_in_ledger();
        let food = create_type(&ledger, "Ăn uống", TransactionKind::Expense);
        let created = ledger
            .create_transaction(
                &session,
                Transaction::build(Decimal::from(30), date!(2024 - 01 - 01), "Bún", food),
            )
            .unwrap();

        let updated = ledger
            .update_transaction(
                &session,
                created.id,
                TransactionChanges {
                    description: Some("  Phở ".to_owned()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.description, "Phở");
        assert_eq!(
            ledger.get_transaction(created.id).unwrap().description,
            "Phở"
        );
    }

    #[test]
    fn update_transaction_fails_on_bad_input() {
        let (ledger, session) = get_logged_in_ledger();
        let food = create_type(&ledger, "Ăn uống", TransactionKind::Expense);
        let created = ledger
            .create_transaction(
                &session,
                Transaction::build(Decimal::from(30), date!(2024 - 01 - 01), "Phở", food),
            )
            .unwrap();

        let negative = ledger.update_transaction(
            &session,
            created.id,
            TransactionChanges {
                amount: Some(Decimal::from(-1)),
                ..Default::default()
            },
        );
        let missing_type = ledger.update_transaction(
            &session,
            created.id,
            TransactionChanges {
                category_id: Some(999),
                ..Default::default()
            },
        );
        let missing = ledger.update_transaction(&session, 999, TransactionChanges::default());

        assert_eq!(negative, Err(Error::NegativeAmount(Decimal::from(-1))));
        assert_eq!(missing_type, Err(Error::InvalidTransactionType(999)));
        assert_eq!(missing, Err(Error::NotFound));
        assert_eq!(ledger.get_transaction(created.id), Ok(created));
    }

    #[test]
    fn delete_transaction_succeeds_then_fails() {
        let (ledger, session) = get_logged_in_ledger();
        let food = create_type(&ledger, "Ăn uống", TransactionKind::Expense);
        let created = ledger
            .create_transaction(
                &session,
                Transaction::build(Decimal::from(30), date!(2024 - 01 - 01), "Phở", food),
            )
            .unwrap();

        ledger.delete_transaction(&session, created.id).unwrap();

        assert_eq!(ledger.get_transaction(created.id), Err(Error::NotFound));
        assert_eq!(
            ledger.delete_transaction(&session, created.id),
            Err(Error::DeleteMissingTransaction(created.id))
        );
        assert_eq!(ledger.activity_by_kind(ActivityKind::Delete).unwrap().len(), 1);
    }

    #[test]
    fn editing_type_does_not_change_stored_transactions() {
        let (ledger, session) = get_logged_in_ledger();
        let food = create_type(&ledger, "Ăn uống", TransactionKind::Expense);
        let created = ledger
            .create_transaction(
                &session,
                Transaction::build(Decimal::from(30), date!(2024 - 01 - 01), "Phở", food.clone()),
            )
            .unwrap();

        ledger
            .update_transaction_type(
                &session,
                food.id,
                TransactionTypeChanges {
                    name: Some(TransactionTypeName::new_unchecked("Ăn ngoài")),
                    kind: None,
                },
            )
            .unwrap();
        ledger.delete_transaction_type(&session, food.id).unwrap();

        let stored = ledger.get_transaction(created.id).unwrap();
        assert_eq!(stored.category.name.as_ref(), "Ăn uống");
        assert_eq!(stored.category, food);
    }

    #[test]
    fn view_filters_and_aggregates() {
        let (ledger, session) = get_logged_in_ledger();
        let food = create_type(&ledger, "Ăn uống", TransactionKind::Expense);
        let salary = create_type(&ledger, "Lương", TransactionKind::Income);
        ledger
            .create_transactions(
                &session,
                vec![
                    Transaction::build(Decimal::from(100), date!(2024 - 01 - 05), "Lương", salary)
                        .status(TransactionStatus::Completed),
                    Transaction::build(Decimal::from(40), date!(2024 - 01 - 10), "Phở", food.clone())
                        .status(TransactionStatus::Completed),
                    Transaction::build(Decimal::from(25), date!(2024 - 02 - 10), "Bún", food),
                ],
            )
            .unwrap();

        let view = ledger
            .view(&FilterSpec {
                date_from: Some(date!(2024 - 01 - 01)),
                date_to: Some(date!(2024 - 01 - 31)),
                status: Some(TransactionStatus::Completed),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(view.transactions.len(), 2);
        assert_eq!(view.statistics.total_income, Decimal::from(100));
        assert_eq!(view.statistics.total_expense, Decimal::from(40));
        assert_eq!(view.statistics.balance, Decimal::from(60));
    }
}
