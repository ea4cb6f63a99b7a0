//! Transaction recording.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the `NewTransaction` description used to create one
//! - The `TransactionStore` port and its ephemeral and SQLite adapters
//! - The `TransactionService` that carries out use cases against a store
//! - The request/response schemas and the endpoint for creating transactions

mod core;
mod create_endpoint;
mod ephemeral_store;
mod schema;
mod service;
mod sqlite_store;
mod store;

pub use core::{Category, NewTransaction, Transaction, TransactionId};
pub use create_endpoint::create_transaction_endpoint;
pub use ephemeral_store::EphemeralTransactionStore;
pub use schema::{TransactionCreate, TransactionRead};
pub use service::TransactionService;
pub use sqlite_store::{SQLiteTransactionStore, create_transaction_table};
pub use store::TransactionStore;

#[cfg(test)]
pub(crate) use sqlite_store::count_transactions;
