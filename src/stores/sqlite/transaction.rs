//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{NewTransaction, Transaction, TransactionId, TransactionType, TransactionTypeName},
    stores::TransactionStore,
};

use super::{lock, parse_column};

const COLUMNS: &str = "id, date, weekday_label, amount, description, status, \
    category_id, category_name, category_kind";

/// Stores transactions in a SQLite database.
///
/// The transaction type is copied into each row rather than referenced, so
/// the transaction type table does not need to exist for this store to work.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn insert(
        connection: &Connection,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let weekday = new_transaction.weekday_label();

        connection
            .prepare_cached(&format!(
                "INSERT INTO \"transaction\" (date, weekday_label, amount, description, status, \
                 category_id, category_name, category_kind)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 RETURNING {COLUMNS}"
            ))?
            .query_row(
                (
                    new_transaction.date,
                    weekday,
                    new_transaction.amount.to_string(),
                    new_transaction.description,
                    new_transaction.status.code(),
                    new_transaction.category.id,
                    new_transaction.category.name.as_ref(),
                    new_transaction.category.kind.code(),
                ),
                Self::map_row,
            )
            .map_err(|error| error.into())
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn create(&self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = lock(&self.connection)?;

        Self::insert(&connection, new_transaction)
    }

    /// Create many transactions inside one SQL transaction.
    ///
    /// If any insert fails, none of the transactions are stored.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn create_many(
        &self,
        new_transactions: Vec<NewTransaction>,
    ) -> Result<Vec<Transaction>, Error> {
        let connection = lock(&self.connection)?;
        let sql_transaction = connection.unchecked_transaction()?;

        let transactions = new_transactions
            .into_iter()
            .map(|new_transaction| Self::insert(&sql_transaction, new_transaction))
            .collect::<Result<Vec<_>, _>>()?;

        sql_transaction.commit()?;

        Ok(transactions)
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: TransactionId) -> Result<Transaction, Error> {
        lock(&self.connection)?
            .prepare(&format!(
                "SELECT {COLUMNS} FROM \"transaction\" WHERE id = :id"
            ))?
            .query_row(&[(":id", &id)], Self::map_row)
            .map_err(|error| error.into())
    }

    /// Retrieve all transactions in the order they were created.
    ///
    /// # Errors
    /// This function will return an [Error::SqlError] if there is an SQL error.
    fn get_all(&self) -> Result<Vec<Transaction>, Error> {
        lock(&self.connection)?
            .prepare(&format!(
                "SELECT {COLUMNS} FROM \"transaction\" ORDER BY id ASC"
            ))?
            .query_map([], Self::map_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }

    /// Overwrite every column of the transaction with the same ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::UpdateMissingTransaction] if no transaction has the ID,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn replace(&self, transaction: &Transaction) -> Result<(), Error> {
        let rows_affected = lock(&self.connection)?.execute(
            "UPDATE \"transaction\"
             SET date = ?1, weekday_label = ?2, amount = ?3, description = ?4, status = ?5,
                 category_id = ?6, category_name = ?7, category_kind = ?8
             WHERE id = ?9",
            (
                transaction.date,
                &transaction.weekday_label,
                transaction.amount.to_string(),
                &transaction.description,
                transaction.status.code(),
                transaction.category.id,
                transaction.category.name.as_ref(),
                transaction.category.kind.code(),
                transaction.id,
            ),
        )?;

        if rows_affected == 0 {
            return Err(Error::UpdateMissingTransaction(transaction.id));
        }

        Ok(())
    }

    /// Delete a transaction by ID.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingTransaction] if no transaction has the ID,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn delete(&self, id: TransactionId) -> Result<(), Error> {
        let rows_affected =
            lock(&self.connection)?.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

        if rows_affected == 0 {
            return Err(Error::DeleteMissingTransaction(id));
        }

        Ok(())
    }
}

impl CreateTable for SQLiteTransactionStore {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute_batch(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                date TEXT NOT NULL,
                weekday_label TEXT NOT NULL,
                amount TEXT NOT NULL,
                description TEXT NOT NULL,
                status TEXT NOT NULL CHECK (status IN ('pending', 'completed')),
                category_id INTEGER NOT NULL,
                category_name TEXT NOT NULL,
                category_kind TEXT NOT NULL CHECK (category_kind IN ('thu', 'chi'))
            );

            CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteTransactionStore {
    type ReturnType = Transaction;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = row.get(offset)?;
        let date = row.get(offset + 1)?;
        let weekday_label = row.get(offset + 2)?;
        let amount = parse_column(row, offset + 3)?;
        let description = row.get(offset + 4)?;
        let status = parse_column(row, offset + 5)?;

        let raw_category_name: String = row.get(offset + 7)?;
        let category = TransactionType {
            id: row.get(offset + 6)?,
            name: TransactionTypeName::new_unchecked(&raw_category_name),
            kind: parse_column(row, offset + 8)?,
        };

        Ok(Transaction {
            id,
            date,
            weekday_label,
            amount,
            description,
            status,
            category,
        })
    }
}

#[cfg(test)]
mod transaction_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        models::{
            Transaction, TransactionKind, TransactionStatus, TransactionType,
            TransactionTypeName,
        },
        stores::TransactionStore,
    };

    use super::SQLiteTransactionStore;

    fn get_test_store() -> SQLiteTransactionStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SQLiteTransactionStore::new(Arc::new(Mutex::new(connection)))
    }

    fn salary() -> TransactionType {
        TransactionType {
            id: 7,
            name: TransactionTypeName::new_unchecked("Lương"),
            kind: TransactionKind::Income,
        }
    }

    #[test]
    fn create_succeeds() {
        let store = get_test_store();
        let amount = Decimal::new(1_234_550, 2);

        let transaction = store
            .create(Transaction::build(
                amount,
                date!(2024 - 01 - 15),
                "Tháng 1",
                salary(),
            ))
            .expect("Could not create transaction");

        assert!(transaction.id > 0);
        assert_eq!(transaction.amount, amount);
        assert_eq!(transaction.weekday_label, "Thứ Hai");
        assert_eq!(transaction.status, TransactionStatus::Pending);
        assert_eq!(transaction.category, salary());
    }

    #[test]
    fn get_returns_created_transaction() {
        let store = get_test_store();
        let created = store
            .create(
                Transaction::build(Decimal::from(5), date!(2024 - 02 - 01), "Cà phê", salary())
                    .status(TransactionStatus::Completed),
            )
            .unwrap();

        let got = store.get(created.id);

        assert_eq!(got, Ok(created));
    }

    #[test]
    fn get_with_invalid_id_returns_not_found() {
        let store = get_test_store();

        assert_eq!(store.get(42), Err(Error::NotFound));
    }

    #[test]
    fn get_all_keeps_insertion_order() {
        let store = get_test_store();
        let want: Vec<Transaction> = [3, 1, 2]
            .into_iter()
            .map(|day| {
                store
                    .create(Transaction::build(
                        Decimal::from(day),
                        date!(2024 - 03 - 01).replace_day(day as u8).unwrap(),
                        "x",
                        salary(),
                    ))
                    .unwrap()
            })
            .collect();

        let got = store.get_all().unwrap();

        assert_eq!(got, want);
    }

    #[test]
    fn create_many_stores_all() {
        let store = get_test_store();
        let new_transactions = vec![
            Transaction::build(Decimal::from(1), date!(2024 - 01 - 01), "a", salary()),
            Transaction::build(Decimal::from(2), date!(2024 - 01 - 02), "b", salary()),
        ];

        let created = store.create_many(new_transactions).unwrap();

        assert_eq!(created.len(), 2);
        assert_eq!(store.get_all().unwrap(), created);
    }

    #[test]
    fn replace_overwrites_fields() {
        let store = get_test_store();
        let mut transaction = store
            .create(Transaction::build(
                Decimal::from(1),
                date!(2024 - 01 - 01),
                "a",
                salary(),
            ))
            .unwrap();
        transaction.description = "b".to_owned();
        transaction.status = TransactionStatus::Completed;

        store.replace(&transaction).unwrap();

        assert_eq!(store.get(transaction.id), Ok(transaction));
    }

    #[test]
    fn replace_missing_transaction_fails() {
        let store = get_test_store();
        let transaction = Transaction {
            id: 99,
            date: date!(2024 - 01 - 01),
            weekday_label: "Thứ Hai".to_owned(),
            amount: Decimal::ONE,
            description: "a".to_owned(),
            status: TransactionStatus::Pending,
            category: salary(),
        };

        assert_eq!(
            store.replace(&transaction),
            Err(Error::UpdateMissingTransaction(99))
        );
    }

    #[test]
    fn delete_succeeds() {
        let store = get_test_store();
        let transaction = store
            .create(Transaction::build(
                Decimal::from(1),
                date!(2024 - 01 - 01),
                "a",
                salary(),
            ))
            .unwrap();

        store.delete(transaction.id).unwrap();

        assert_eq!(store.get(transaction.id), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_transaction_fails() {
        let store = get_test_store();

        assert_eq!(store.delete(5), Err(Error::DeleteMissingTransaction(5)));
    }
}
