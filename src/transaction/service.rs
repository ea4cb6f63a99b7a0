//! The use cases for transactions.

use crate::{
    Error,
    transaction::{NewTransaction, Transaction, TransactionStore},
};

/// Carries out transaction use cases on top of whichever [TransactionStore] it is given.
///
/// The store is injected by the caller so that the storage technology can change without
/// touching the use-case logic.
#[derive(Debug, Clone)]
pub struct TransactionService<S> {
    store: S,
}

impl<S> TransactionService<S>
where
    S: TransactionStore,
{
    /// Create a service that records transactions in `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a new transaction.
    ///
    /// # Errors
    /// Returns whatever error the store returns.
    pub fn create_transaction(
        &mut self,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let transaction = self.store.create(new_transaction)?;

        tracing::debug!(
            "created transaction {} in category {}",
            transaction.id(),
            transaction.category()
        );

        Ok(transaction)
    }
}
