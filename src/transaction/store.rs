//! Defines the transaction store trait.

use crate::{
    Error,
    transaction::{NewTransaction, Transaction},
};

/// Handles the creation of transactions, independent of how (or whether) they are stored.
///
/// Implementers assign the ID and creation time of each transaction.
pub trait TransactionStore {
    /// Create a new transaction in the store.
    ///
    /// # Errors
    /// Implementers should return an error describing why the transaction could not be
    /// stored, e.g. [Error::StoreUnavailable] if the backing store is busy.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error>;
}

impl<S> TransactionStore for Box<S>
where
    S: TransactionStore + ?Sized,
{
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        (**self).create(new_transaction)
    }
}
