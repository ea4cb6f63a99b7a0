//! Core transaction domain types.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::Error;

/// An opaque, unique identifier for a [Transaction].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generate a fresh, random ID.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing ID without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl AsRef<str> for TransactionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated, non-empty category label, e.g. 'Groceries'.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Category(String);

impl Category {
    /// Create a category label.
    ///
    /// The label is kept exactly as given, including any surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategory] if `name` is empty
    /// or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.trim().is_empty() {
            Err(Error::EmptyCategory)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the non-empty
    /// invariant is violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::new(s)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are create-only: once a store hands one out, none of its fields change.
/// To create a new `Transaction`, start with [Transaction::build] and pass the result to a
/// [TransactionStore](crate::TransactionStore).
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: TransactionId,
    amount: Decimal,
    category: Category,
    note: Option<String>,
    created_at: OffsetDateTime,
}

impl Transaction {
    /// Start describing a new transaction.
    ///
    /// Shortcut for [NewTransaction::new] for discoverability.
    pub fn build(amount: Decimal, category: Category) -> NewTransaction {
        NewTransaction::new(amount, category)
    }

    /// Assemble a transaction from the parts a store assigns (`id`, `created_at`) and the
    /// caller's `new_transaction`.
    pub(crate) fn from_parts(
        id: TransactionId,
        new_transaction: NewTransaction,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            amount: new_transaction.amount,
            category: new_transaction.category,
            note: new_transaction.note,
            created_at,
        }
    }

    /// The unique ID of the transaction.
    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    /// The amount of money spent or earned in this transaction.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// The label describing what kind of transaction this is.
    pub fn category(&self) -> &Category {
        &self.category
    }

    /// Free text about the transaction, if any was given.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// When the transaction was recorded, in UTC.
    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

/// The caller-supplied details of a [Transaction] that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// The value of the transaction.
    pub amount: Decimal,
    /// The label describing what kind of transaction this is.
    pub category: Category,
    /// Free text about the transaction.
    pub note: Option<String>,
}

impl NewTransaction {
    /// Describe a transaction with no note.
    pub fn new(amount: Decimal, category: Category) -> Self {
        Self {
            amount,
            category,
            note: None,
        }
    }

    /// Set the note.
    pub fn note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }
}
