//! Implements a SQLite backed transaction store.
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    transaction::{NewTransaction, Transaction, TransactionId, TransactionStore},
};

/// Create the transaction table if it does not already exist.
///
/// Amounts are stored as decimal text so that no precision is lost.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id TEXT PRIMARY KEY NOT NULL,
                amount TEXT NOT NULL,
                category TEXT NOT NULL,
                note TEXT,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Write `transaction` to the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateTransactionId] if a row with the same ID exists,
/// - [Error::StoreUnavailable] if the database is busy,
/// - or [Error::SqlError] if there is some other SQL error.
pub(crate) fn insert_transaction(
    transaction: &Transaction,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO \"transaction\" (id, amount, category, note, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            transaction.id().as_ref(),
            transaction.amount().to_string(),
            transaction.category().as_ref(),
            transaction.note(),
            transaction.created_at(),
        ),
    )?;

    Ok(())
}

/// Stores transactions in a SQLite database.
///
/// The database must have been set up with [initialize](crate::initialize_db) first.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the connection mutex is poisoned,
    /// - [Error::DuplicateTransactionId] if the generated ID is already taken,
    /// - [Error::StoreUnavailable] if the database is busy,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let transaction = Transaction::from_parts(
            TransactionId::new_v4(),
            new_transaction,
            OffsetDateTime::now_utc(),
        );

        let connection = self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        insert_transaction(&transaction, &connection)?;

        tracing::debug!("stored transaction {}", transaction.id());

        Ok(transaction)
    }
}

#[cfg(test)]
pub(crate) fn count_transactions(connection: &Connection) -> Result<i64, rusqlite::Error> {
    connection.query_row("SELECT COUNT(*) FROM \"transaction\"", (), |row| row.get(0))
}
