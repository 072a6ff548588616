//! Implements bearer-token authentication: issuing tokens at sign-in and
//! verifying the tokens presented on protected routes.
//!
//! Verification is stateless: the user ID is a claim inside the signed
//! token, so no database access is needed to authenticate a request.

use axum::{
    Json, RequestPartsExt,
    body::Body,
    extract::{FromRef, FromRequestParts, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejectionReason,
};
use chrono::{Duration, Utc};
use email_address::EmailAddress;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    Error,
    models::{RawPassword, UserID},
    state::AppState,
    stores::UserStore,
};

/// The duration in minutes that a bearer token stays valid for.
const TOKEN_DURATION_MINUTES: i64 = 15;

/// The contents of a JSON Web Token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub user_id: UserID,
    /// The expiry time of the token as a unix timestamp.
    pub exp: usize,
    /// The time the token was issued as a unix timestamp.
    pub iat: usize,
}

impl<S> FromRequestParts<S> for Claims
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|rejection| match rejection.reason() {
                TypedHeaderRejectionReason::Missing => AuthError::MissingToken,
                _ => AuthError::InvalidToken,
            })?;

        let state = AppState::from_ref(state);
        let token_data = decode_jwt(bearer.token(), &state.jwt_keys.decoding_key)?;

        Ok(token_data.claims)
    }
}

/// The errors that may occur while authenticating a request.
#[derive(Debug, PartialEq)]
pub enum AuthError {
    /// The request did not include a bearer token.
    MissingToken,
    /// The bearer token was malformed, tampered with or expired.
    InvalidToken,
    /// The email and password did not match a registered user.
    WrongCredentials,
    /// A new token could not be signed.
    TokenCreation,
    /// An unexpected error occurred in a third-party library.
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response<Body> {
        let (status, error_message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "authentication required"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid or expired token"),
            AuthError::WrongCredentials => (StatusCode::UNAUTHORIZED, "incorrect email or password"),
            AuthError::TokenCreation => (StatusCode::INTERNAL_SERVER_ERROR, "token creation error"),
            AuthError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Sign a new token for `user_id`.
pub(crate) fn encode_jwt(user_id: UserID, encoding_key: &EncodingKey) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = (now + Duration::minutes(TOKEN_DURATION_MINUTES)).timestamp() as usize;
    let iat = now.timestamp() as usize;
    let claims = Claims { user_id, exp, iat };

    encode(&Header::default(), &claims, encoding_key).map_err(|_| AuthError::TokenCreation)
}

fn decode_jwt(token: &str, decoding_key: &DecodingKey) -> Result<TokenData<Claims>, AuthError> {
    decode(token, decoding_key, &Validation::default()).map_err(|_| AuthError::InvalidToken)
}

/// The credentials for signing in to the application.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    /// Email entered during sign-in.
    pub email: EmailAddress,
    /// Password entered during sign-in.
    pub password: RawPassword,
}

/// The response body for a successful sign-in.
#[derive(Debug, Serialize, Deserialize)]
pub struct SignInResponse {
    /// The bearer token the client should present on ledger routes.
    pub token: String,
}

/// Handler for sign-in requests.
///
/// # Errors
/// This function will return an error in a few situations.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(user_data): Json<Credentials>,
) -> Result<Json<SignInResponse>, AuthError> {
    let user = state
        .user_store
        .get_by_email(&user_data.email)
        .map_err(|error| match error {
            Error::NotFound => AuthError::WrongCredentials,
            error => {
                tracing::error!("Error matching user: {error:?}");
                AuthError::InternalError
            }
        })?;

    let password_is_correct = user
        .password_hash()
        .verify(&user_data.password)
        .map_err(|error| {
            tracing::error!("Error verifying password: {error}");
            AuthError::InternalError
        })?;

    if password_is_correct {
        let token = encode_jwt(user.id(), &state.jwt_keys.encoding_key)?;

        Ok(Json(SignInResponse { token }))
    } else {
        Err(AuthError::WrongCredentials)
    }
}

#[cfg(test)]
mod jwt_tests {
    use jsonwebtoken::{Header, encode};

    use crate::{
        auth::{AuthError, Claims, decode_jwt, encode_jwt},
        models::UserID,
        state::JwtKeys,
    };

    #[test]
    fn decode_jwt_gives_back_user_id() {
        let keys = JwtKeys::new("foobar");
        let user_id = UserID::new(42);

        let token = encode_jwt(user_id, &keys.encoding_key).unwrap();
        let claims = decode_jwt(&token, &keys.decoding_key).unwrap().claims;

        assert_eq!(claims.user_id, user_id);
    }

    #[test]
    fn decode_jwt_fails_on_expired_token() {
        let keys = JwtKeys::new("foobar");
        let issued_at = chrono::Utc::now().timestamp() as usize - 600;
        let claims = Claims {
            user_id: UserID::new(42),
            // Far enough in the past to be outside the default leeway.
            exp: issued_at + 120,
            iat: issued_at,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding_key).unwrap();

        let result = decode_jwt(&token, &keys.decoding_key);

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn decode_jwt_fails_on_wrong_secret() {
        let keys = JwtKeys::new("foobar");
        let other_keys = JwtKeys::new("notfoobar");

        let token = encode_jwt(UserID::new(42), &keys.encoding_key).unwrap();
        let result = decode_jwt(&token, &other_keys.decoding_key);

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn decode_jwt_fails_on_garbage() {
        let keys = JwtKeys::new("foobar");

        let result = decode_jwt("not.a.token", &keys.decoding_key);

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
