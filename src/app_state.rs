//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error, EphemeralTransactionStore, SQLiteTransactionStore, TransactionStore, db::initialize,
};

/// Selects the [TransactionStore] that request handlers build for each request.
#[derive(Debug, Clone)]
pub enum TransactionStoreConfig {
    /// Transactions are handed back to the client and then forgotten.
    Ephemeral,
    /// Transactions are written to a SQLite database shared by all requests.
    SQLite(Arc<Mutex<Connection>>),
}

impl TransactionStoreConfig {
    /// Build a new store instance.
    ///
    /// Only the database connection handle is shared between instances; stores hold no other
    /// state between requests.
    pub fn build_store(&self) -> Box<dyn TransactionStore + Send> {
        match self {
            TransactionStoreConfig::Ephemeral => Box::new(EphemeralTransactionStore),
            TransactionStoreConfig::SQLite(connection) => {
                Box::new(SQLiteTransactionStore::new(connection.clone()))
            }
        }
    }
}

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where created transactions go.
    pub transaction_store: TransactionStoreConfig,
}

impl AppState {
    /// Create a new [AppState] that uses `transaction_store`.
    pub fn new(transaction_store: TransactionStoreConfig) -> Self {
        Self { transaction_store }
    }

    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn with_sqlite(db_connection: Connection) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self::new(TransactionStoreConfig::SQLite(Arc::new(
            Mutex::new(db_connection),
        ))))
    }
}
