//! The service boundary between front ends and the record stores.
//!
//! [Ledger] validates input before any store call, checks for conflicts,
//! copies transaction types into transactions, and records every successful
//! change to the activity log. Read-only views are computed by the
//! [query](crate::query) engine over a full fetch of the transactions.

mod accounts;
mod transaction_types;
mod transactions;

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    ActivityLog, Error, LedgerConfig,
    db::initialize,
    models::{Transaction, TransactionType},
    query::{Statistics, aggregate, recent},
    stores::{
        AccountStore, ActivityStore, TransactionStore, TransactionTypeStore,
        sqlite::{
            SQLiteAccountStore, SQLiteActivityStore, SQLiteTransactionStore,
            SQLiteTransactionTypeStore,
        },
    },
};

/// Every transaction and transaction type, fetched together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// All transactions in the order they were stored.
    pub transactions: Vec<Transaction>,
    /// All transaction types in the order they were stored.
    pub transaction_types: Vec<TransactionType>,
}

/// The overview shown after logging in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Statistics over every transaction.
    pub statistics: Statistics,
    /// The latest transactions, newest first.
    pub recent_transactions: Vec<Transaction>,
}

impl Dashboard {
    /// Build the dashboard for `transactions`, listing the `recent_count`
    /// latest ones.
    pub fn compute(transactions: &[Transaction], recent_count: usize) -> Self {
        Self {
            statistics: aggregate(transactions),
            recent_transactions: recent(transactions, recent_count),
        }
    }
}

/// The ledger service, generic over one store per record collection.
#[derive(Debug, Clone)]
pub struct Ledger<T, Y, A, H>
where
    T: TransactionStore,
    Y: TransactionTypeStore,
    A: AccountStore,
    H: ActivityStore,
{
    transaction_store: T,
    transaction_type_store: Y,
    account_store: A,
    activity_log: ActivityLog<H>,
    config: LedgerConfig,
}

/// A [Ledger] backed by SQLite.
pub type SQLiteLedger = Ledger<
    SQLiteTransactionStore,
    SQLiteTransactionTypeStore,
    SQLiteAccountStore,
    SQLiteActivityStore,
>;

/// Create a [Ledger] that keeps its records in the SQLite database behind
/// `connection`.
///
/// The tables for every record collection are created if they do not exist.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_sqlite_ledger(
    connection: Connection,
    config: LedgerConfig,
) -> Result<SQLiteLedger, Error> {
    initialize(&connection)?;

    let connection = Arc::new(Mutex::new(connection));

    Ok(Ledger::new(
        SQLiteTransactionStore::new(connection.clone()),
        SQLiteTransactionTypeStore::new(connection.clone()),
        SQLiteAccountStore::new(connection.clone()),
        SQLiteActivityStore::new(connection),
        config,
    ))
}

impl<T, Y, A, H> Ledger<T, Y, A, H>
where
    T: TransactionStore,
    Y: TransactionTypeStore,
    A: AccountStore,
    H: ActivityStore,
{
    /// Create a ledger from its stores.
    pub fn new(
        transaction_store: T,
        transaction_type_store: Y,
        account_store: A,
        activity_store: H,
        config: LedgerConfig,
    ) -> Self {
        Self {
            transaction_store,
            transaction_type_store,
            account_store,
            activity_log: ActivityLog::new(activity_store),
            config,
        }
    }

    /// The settings the ledger was created with.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Statistics over every transaction plus the latest few transactions.
    ///
    /// # Errors
    /// Returns an error if the transactions cannot be fetched.
    pub fn dashboard(&self) -> Result<Dashboard, Error> {
        let transactions = self.transaction_store.get_all()?;

        Ok(Dashboard::compute(
            &transactions,
            self.config.recent_transaction_count,
        ))
    }
}

impl<T, Y, A, H> Ledger<T, Y, A, H>
where
    T: TransactionStore + Clone + Send + 'static,
    Y: TransactionTypeStore + Clone + Send + 'static,
    A: AccountStore,
    H: ActivityStore,
{
    /// Fetch every transaction and transaction type.
    ///
    /// Both fetches run at the same time on the blocking thread pool. The
    /// snapshot is returned once both have finished, or the first error once
    /// either fails.
    ///
    /// # Errors
    /// Returns the store error of a failed fetch, or
    /// [Error::BackgroundTask] if a fetch panicked.
    pub async fn load_snapshot(&self) -> Result<Snapshot, Error> {
        let transaction_store = self.transaction_store.clone();
        let transaction_type_store = self.transaction_type_store.clone();

        let (transactions, transaction_types) = tokio::try_join!(
            run_blocking(move || transaction_store.get_all()),
            run_blocking(move || transaction_type_store.get_all()),
        )?;

        tracing::debug!(
            "loaded {} transactions and {} transaction types",
            transactions.len(),
            transaction_types.len()
        );

        Ok(Snapshot {
            transactions,
            transaction_types,
        })
    }
}

async fn run_blocking<F, R>(fetch: F) -> Result<R, Error>
where
    F: FnOnce() -> Result<R, Error> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(fetch)
        .await
        .map_err(|error| Error::BackgroundTask(error.to_string()))?
}


#[cfg(test)]
mod ledger_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Error, LedgerConfig,
        db::initialize,
        models::{
            Transaction, TransactionKind, TransactionStatus, TransactionType,
            TransactionTypeChanges, TransactionTypeId, TransactionTypeName,
        },
        stores::{
            TransactionStore, TransactionTypeStore,
            sqlite::{SQLiteAccountStore, SQLiteActivityStore, SQLiteTransactionStore},
        },
    };

    use super::{
        Ledger,
        test_utils::{create_type, get_logged_in_ledger, get_test_ledger},
    };

    /// A transaction type store whose reads always fail.
    #[derive(Debug, Clone)]
    struct BrokenTypeStore;

    impl TransactionTypeStore for BrokenTypeStore {
        fn create(
            &self,
            _name: TransactionTypeName,
            _kind: TransactionKind,
        ) -> Result<TransactionType, Error> {
            Err(Error::DatabaseLockError)
        }

        fn get(&self, _id: TransactionTypeId) -> Result<TransactionType, Error> {
            Err(Error::DatabaseLockError)
        }

        fn get_all(&self) -> Result<Vec<TransactionType>, Error> {
            Err(Error::DatabaseLockError)
        }

        fn get_by_kind(&self, _kind: TransactionKind) -> Result<Vec<TransactionType>, Error> {
            Err(Error::DatabaseLockError)
        }

        fn update(
            &self,
            _id: TransactionTypeId,
            _changes: &TransactionTypeChanges,
        ) -> Result<(), Error> {
            Err(Error::DatabaseLockError)
        }

        fn delete(&self, _id: TransactionTypeId) -> Result<(), Error> {
            Err(Error::DatabaseLockError)
        }
    }

    #[tokio::test]
    async fn load_snapshot_fails_if_either_fetch_fails() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));
        let ledger = Ledger::new(
            SQLiteTransactionStore::new(connection.clone()),
            BrokenTypeStore,
            SQLiteAccountStore::new(connection.clone()),
            SQLiteActivityStore::new(connection),
            LedgerConfig::default(),
        );

        let result = ledger.load_snapshot().await;

        assert_eq!(result, Err(Error::DatabaseLockError));
    }

    #[tokio::test]
    async fn load_snapshot_returns_both_collections() {
        let (ledger, _session) = get_logged_in_ledger();
        let salary = create_type(&ledger, "Lương", TransactionKind::Income);
        let food = create_type(&ledger, "Ăn uống", TransactionKind::Expense);
        let transaction = ledger
            .transaction_store
            .create(Transaction::build(
                Decimal::from(100),
                date!(2024 - 01 - 01),
                "Lương tháng 1",
                salary.clone(),
            ))
            .unwrap();

        let snapshot = ledger.load_snapshot().await.unwrap();

        assert_eq!(snapshot.transactions, vec![transaction]);
        assert_eq!(snapshot.transaction_types, vec![salary, food]);
    }

    #[tokio::test]
    async fn load_snapshot_of_empty_ledger() {
        let ledger = get_test_ledger();

        let snapshot = ledger.load_snapshot().await.unwrap();

        assert!(snapshot.transactions.is_empty());
        assert!(snapshot.transaction_types.is_empty());
    }

    #[test]
    fn dashboard_shows_totals_and_latest_five() {
        let (ledger, _session) = get_logged_in_ledger();
        let salary = create_type(&ledger, "Lương", TransactionKind::Income);
        let food = create_type(&ledger, "Ăn uống", TransactionKind::Expense);
        ledger
            .transaction_store
            .create(
                Transaction::build(Decimal::from(1000), date!(2024 - 01 - 01), "Lương", salary)
                    .status(TransactionStatus::Completed),
            )
            .unwrap();
        for day in 2..=7 {
            ledger
                .transaction_store
                .create(Transaction::build(
                    Decimal::from(10),
                    date!(2024 - 01 - 01).replace_day(day).unwrap(),
                    "Cơm",
                    food.clone(),
                ))
                .unwrap();
        }

        let dashboard = ledger.dashboard().unwrap();

        assert_eq!(dashboard.statistics.total_income, Decimal::from(1000));
        assert_eq!(dashboard.statistics.total_expense, Decimal::from(60));
        assert_eq!(dashboard.statistics.balance, Decimal::from(940));
        assert_eq!(dashboard.statistics.transaction_count, 7);
        assert_eq!(dashboard.statistics.completed_count, 1);
        assert_eq!(dashboard.recent_transactions.len(), 5);
        assert_eq!(
            dashboard.recent_transactions[0].date,
            date!(2024 - 01 - 07)
        );
    }
}
