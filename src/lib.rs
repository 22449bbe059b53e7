//! Sales dashboard is a REST backend for browsing product sale transactions.
//!
//! This library provides a JSON API for listing and searching transactions,
//! computing monthly sale statistics, and producing the data behind the
//! dashboard's bar and pie charts.

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
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod month;
mod not_found;
mod pagination;
mod routing;
mod seed;
mod stores;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::PaginationConfig;
pub use routing::build_router;
pub use seed::{DEFAULT_SEED_URL, HttpSeedSource, SeedSource};
pub use stores::{SQLiteTransactionStore, TransactionStore};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The month query parameter was missing, not an integer, or outside 1-12.
    #[error("Invalid month number")]
    InvalidMonth,

    /// The page or page size query parameter was not a positive integer.
    #[error("Invalid pagination parameters")]
    InvalidPagination,

    /// The transaction ID query parameter was missing or not a positive integer.
    #[error("Invalid transaction ID")]
    InvalidTransactionId,

    /// The seed source returned data that is not a non-empty array of
    /// well-formed records.
    ///
    /// The string describes what was wrong and is only logged on the server.
    #[error("Invalid API data format")]
    InvalidSeedData(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("Transaction not found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A blocking database task panicked or was cancelled.
    #[error("a blocking database task failed: {0}")]
    BlockingTaskFailed(String),

    /// The seed source could not be reached or did not respond successfully.
    #[error("could not fetch seed data: {0}")]
    SeedFetchError(String),

    /// An operation did not finish within its time limit.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.into_json_response("Internal server error")
    }
}

impl Error {
    /// Convert the error into a JSON response of the form `{"message": ...}`.
    ///
    /// Client errors carry their own message. Any other error is logged and
    /// replaced with `failure_message` so internal details never reach the
    /// client.
    pub(crate) fn into_json_response(self, failure_message: &str) -> Response {
        match self {
            Error::InvalidMonth | Error::InvalidPagination | Error::InvalidTransactionId => {
                json_message(StatusCode::BAD_REQUEST, &self.to_string())
            }
            Error::InvalidSeedData(ref reason) => {
                tracing::warn!("rejected seed data: {reason}");
                json_message(StatusCode::BAD_REQUEST, &self.to_string())
            }
            Error::NotFound => json_message(StatusCode::NOT_FOUND, &self.to_string()),
            error => {
                tracing::error!("{failure_message}: {error}");
                json_message(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
            }
        }
    }
}

/// A JSON response with a single `message` field.
pub(crate) fn json_message(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}
