//! The endpoints for creating, listing and deleting ledger transactions.
//!
//! These handlers are the authorization boundary of the ledger: every
//! operation is scoped to the user identified by the bearer token, and a
//! transaction can only ever be read or deleted by its owner.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    Error,
    auth::Claims,
    models::{DatabaseID, NewTransaction},
    state::AppState,
    stores::TransactionStore,
};

/// A route handler for creating a new transaction.
///
/// The owner of the new transaction is always the authenticated user; any
/// owner field the client supplies in the request body is ignored.
///
/// # Errors
/// Returns a 400 response if the transaction data violates the ledger's
/// validation rules. Nothing is persisted in that case.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn create_transaction(
    State(mut state): State<AppState>,
    claims: Claims,
    Json(data): Json<NewTransaction>,
) -> Result<impl IntoResponse, Error> {
    let transaction = state.transaction_store.create(claims.user_id, data)?;

    Ok((StatusCode::OK, Json(transaction)))
}

/// A route handler for listing the authenticated user's transactions, most
/// recently recorded first.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn get_transactions(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<impl IntoResponse, Error> {
    let transactions = state.transaction_store.get_by_user(claims.user_id)?;

    Ok((StatusCode::OK, Json(transactions)))
}

/// A route handler for deleting a transaction by its ID.
///
/// The transaction must exist (404 otherwise) and belong to the
/// authenticated user (403 otherwise). Deletion is permanent.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn delete_transaction(
    State(mut state): State<AppState>,
    claims: Claims,
    Path(transaction_id): Path<DatabaseID>,
) -> Result<impl IntoResponse, Error> {
    let transaction = state.transaction_store.get(transaction_id)?;

    if transaction.user_id() != claims.user_id {
        return Err(Error::Forbidden);
    }

    state.transaction_store.delete(transaction_id)?;

    Ok((StatusCode::OK, Json(json!({ "msg": "Transaction deleted" }))))
}
