//! MoneyTrace is a small web service for logging money transactions.
//!
//! This library provides a JSON API for recording a transaction (an amount, a
//! category and an optional note). Requests pass through a controller, a
//! service and a storage port before reaching the domain model, so the storage
//! technology can be swapped without touching the use-case logic.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
mod frontend;
mod health;
mod logging;
mod not_found;
mod routing;
mod transaction;
mod validation;

pub use app_state::{AppState, TransactionStoreConfig};
pub use db::initialize as initialize_db;
pub use frontend::resolve_frontend_dir;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use transaction::{
    Category, EphemeralTransactionStore, NewTransaction, SQLiteTransactionStore, Transaction,
    TransactionCreate, TransactionId, TransactionRead, TransactionService, TransactionStore,
};
pub use validation::{FieldError, FieldErrorKind, ValidationErrors};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body did not match the expected schema.
    ///
    /// Holds one entry per offending field so that clients can fix every
    /// problem in a single round trip.
    #[error("the request body failed validation: {0}")]
    Validation(ValidationErrors),

    /// The request body was not sent as JSON.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The request body was larger than the body size limit.
    #[error("the request body is too large")]
    PayloadTooLarge,

    /// An empty or whitespace-only string was used to create a category.
    ///
    /// Request bodies report this as a field error instead, so it is never sent to a client
    /// as-is.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// A transaction with the same ID already exists in the store.
    ///
    /// IDs are random v4 UUIDs, so this should only happen if a store is fed
    /// the same transaction twice.
    #[error("a transaction with the same ID already exists")]
    DuplicateTransactionId,

    /// The store is temporarily unable to accept writes, e.g. the SQLite
    /// database file is locked by another process.
    #[error("the transaction store is temporarily unavailable")]
    StoreUnavailable,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 1555 occurs when a PRIMARY KEY constraint failed, 2067 when a UNIQUE
            // constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, _)
                if matches!(sql_error.extended_code, 1555 | 2067) =>
            {
                Error::DuplicateTransactionId
            }
            rusqlite::Error::SqliteFailure(sql_error, _)
                if matches!(
                    sql_error.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                ) =>
            {
                tracing::warn!("the database is busy: {sql_error}");
                Error::StoreUnavailable
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": errors })),
            )
                .into_response(),
            Error::UnsupportedMediaType(description) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(json!({ "detail": description })),
            )
                .into_response(),
            Error::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({ "detail": "Request body is too large" })),
            )
                .into_response(),
            Error::DuplicateTransactionId => (
                StatusCode::CONFLICT,
                Json(json!({ "detail": "A transaction with the same ID already exists" })),
            )
                .into_response(),
            Error::StoreUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "detail": "The service is busy, try again shortly" })),
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}
