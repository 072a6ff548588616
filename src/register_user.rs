//! The endpoint for registering a new user account.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use email_address::EmailAddress;
use serde::Deserialize;

use crate::{
    Error,
    models::{NewUser, PasswordHash, RawPassword},
    state::AppState,
    stores::UserStore,
};

/// The form data for registering a new user.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// The display name for the new account.
    pub name: String,
    /// The email address to register.
    pub email: EmailAddress,
    /// The plain-text password to protect the account with.
    pub password: String,
}

/// A route handler for registering a new user account.
///
/// Responds with the stored user record. The password hash is never included
/// in the response.
///
/// # Errors
/// This function will return an error in a few situations.
/// - The password does not meet the minimum requirements.
/// - The email address is already registered (case-insensitive).
/// - An internal error occurred while hashing the password.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn register_user(
    State(mut state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, Error> {
    let password = RawPassword::new(request.password)?;
    let password_hash = PasswordHash::new(password)?;

    let user = state.user_store.create(NewUser {
        email: request.email,
        name: request.name,
        password_hash,
    })?;

    Ok((StatusCode::OK, Json(user)))
}
