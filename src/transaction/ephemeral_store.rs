//! Implements a transaction store that keeps nothing.
use time::OffsetDateTime;

use crate::{
    Error,
    transaction::{NewTransaction, Transaction, TransactionId, TransactionStore},
};

/// Hands out transactions without writing them anywhere.
///
/// Each transaction gets a fresh v4 UUID and the current UTC time, and is forgotten once
/// the caller drops it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EphemeralTransactionStore;

impl TransactionStore for EphemeralTransactionStore {
    /// Create a transaction without storing it.
    ///
    /// This function never returns an error.
    fn create(&mut self, new_transaction: NewTransaction) -> Result<Transaction, Error> {
        let transaction = Transaction::from_parts(
            TransactionId::new_v4(),
            new_transaction,
            OffsetDateTime::now_utc(),
        );

        tracing::debug!("created ephemeral transaction {}", transaction.id());

        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use time::{OffsetDateTime, UtcOffset};

    use crate::transaction::{
        Category, EphemeralTransactionStore, Transaction, TransactionStore,
    };

    #[test]
    fn create_copies_fields_and_assigns_id_and_time() {
        let mut store = EphemeralTransactionStore;
        let amount = Decimal::from_str("12.345").unwrap();
        let before = OffsetDateTime::now_utc();

        let transaction = store
            .create(
                Transaction::build(amount, Category::new_unchecked("Food"))
                    .note(Some("lunch".to_owned())),
            )
            .unwrap();

        assert!(!transaction.id().as_ref().is_empty());
        assert_eq!(transaction.amount(), amount);
        assert_eq!(transaction.category().as_ref(), "Food");
        assert_eq!(transaction.note(), Some("lunch"));
        assert!(transaction.created_at() >= before);
        assert!(transaction.created_at() <= OffsetDateTime::now_utc());
        assert_eq!(transaction.created_at().offset(), UtcOffset::UTC);
    }

    #[test]
    fn identical_inputs_get_distinct_ids() {
        let mut store = EphemeralTransactionStore;
        let new_transaction = Transaction::build(Decimal::ONE, Category::new_unchecked("Food"));

        let first = store.create(new_transaction.clone()).unwrap();
        let second = store.create(new_transaction).unwrap();

        assert_ne!(first.id(), second.id());
    }
}
