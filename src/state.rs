//! Implements the shared state of the REST server.

use std::sync::{Arc, Mutex};

use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;

use crate::{
    Error,
    db::initialize,
    stores::{SQLiteTransactionStore, SQLiteUserStore},
    tips::{TipsConfig, TipsGateway},
};

/// The keys for signing and verifying JSON Web Tokens.
#[derive(Clone)]
pub struct JwtKeys {
    /// The key for signing new tokens.
    pub encoding_key: EncodingKey,
    /// The key for verifying presented tokens.
    pub decoding_key: DecodingKey,
}

impl JwtKeys {
    /// Create a signing and verifying key pair from the shared `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_ref()),
            decoding_key: DecodingKey::from_secret(secret.as_ref()),
        }
    }
}

/// The state of the REST server.
///
/// The JWT keys and the tips gateway configuration are created once at
/// startup and are read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    /// The keys for signing and verifying auth tokens.
    pub jwt_keys: JwtKeys,
    /// The store for managing [users](crate::models::User).
    pub user_store: SQLiteUserStore,
    /// The store for managing user [transactions](crate::models::Transaction).
    pub transaction_store: SQLiteTransactionStore,
    /// The gateway for fetching budgeting tips from the external generator.
    pub tips_gateway: TipsGateway,
}

/// Creates an [AppState] over a SQLite database connection.
///
/// This function will modify the database by adding the tables for the
/// domain models.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_app_state(
    db_connection: Connection,
    jwt_secret: &str,
    tips_config: TipsConfig,
) -> Result<AppState, Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));

    Ok(AppState {
        jwt_keys: JwtKeys::new(jwt_secret),
        user_store: SQLiteUserStore::new(connection.clone()),
        transaction_store: SQLiteTransactionStore::new(connection),
        tips_gateway: TipsGateway::new(tips_config),
    })
}
