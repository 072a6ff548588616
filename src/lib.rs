//! Fintrack is a personal finance tracker: users register, sign in, record
//! income and expense transactions, and review spending summaries and
//! budgeting tips.
//!
//! This library provides a JSON REST API backed by a SQLite database.

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

mod auth;
mod db;
mod endpoints;
mod models;
mod register_user;
mod routing;
mod state;
mod stores;
mod summary;
mod tips;
mod transaction;

pub use models::{Transaction, TransactionType, User, UserID};
pub use routing::build_router;
pub use state::{AppState, JwtKeys, create_app_state};
pub use tips::{TipsConfig, TipsGateway, TipsOutcome};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
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
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction amount was negative, NaN or infinite.
    #[error("transaction amounts must be finite and non-negative")]
    InvalidAmount,

    /// An empty string was used for a transaction category.
    #[error("transaction categories cannot be empty")]
    EmptyCategory,

    /// A string could not be parsed as a transaction type.
    #[error("{0} is not a valid transaction type")]
    InvalidTransactionType(String),

    /// The password did not meet the minimum requirements.
    #[error("invalid password: {0}")]
    InvalidPassword(String),

    /// The email address is already registered.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// The requested resource was not found.
    ///
    /// The client should check that the parameters (e.g., ID) are correct and
    /// that the resource has been created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The requested resource belongs to another user.
    #[error("the requested resource belongs to another user")]
    Forbidden,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server,
    /// it is not shown to the client.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("email") =>
            {
                Error::DuplicateEmail
            }
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
        let (status, error_message) = match &self {
            Error::InvalidAmount
            | Error::EmptyCategory
            | Error::InvalidTransactionType(_)
            | Error::InvalidPassword(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::DuplicateEmail => (StatusCode::CONFLICT, self.to_string()),
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Error::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
