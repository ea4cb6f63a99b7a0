//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};

use crate::{
    AppState, Error, TransactionStoreConfig,
    transaction::{TransactionCreate, TransactionRead, TransactionService},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// Which store new transactions go to.
    pub transaction_store: TransactionStoreConfig,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// The body is validated by the [TransactionCreate] extractor before this function runs.
/// A fresh store and service are built for every request.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    payload: TransactionCreate,
) -> Result<(StatusCode, Json<TransactionRead>), Error> {
    let mut service = TransactionService::new(state.transaction_store.build_store());

    let transaction = service
        .create_transaction(payload.into_new_transaction())
        .inspect_err(|error| tracing::error!("could not create transaction: {error}"))?;

    Ok((StatusCode::CREATED, Json(transaction.into())))
}
