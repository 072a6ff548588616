//! Newtypes for passwords that ensure raw passwords are validated before use
//! and are never stored in place of a password hash.

use std::{fmt::Display, ops::Deref};

use bcrypt::{DEFAULT_COST, hash, verify};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The minimum number of characters a password must have.
const MIN_PASSWORD_LENGTH: usize = 14;

/// A bcrypt hash of a user's password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Create a hashed password from a validated password.
    ///
    /// # Errors
    /// Returns an [Error::HashingError] if the password could not be hashed.
    pub fn new(raw_password: RawPassword) -> Result<Self, Error> {
        hash(&raw_password, DEFAULT_COST)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// This is intended to be used with strings coming out of a trusted
    /// source such as the application's database.
    pub fn new_unchecked(raw_password_hash: String) -> Self {
        Self(raw_password_hash)
    }

    /// Check that `raw_password` matches the stored password.
    ///
    /// # Errors
    /// Returns an [Error::HashingError] if the stored hash could not be
    /// parsed by the hashing library.
    pub fn verify(&self, raw_password: &RawPassword) -> Result<bool, Error> {
        verify(raw_password, self).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for PasswordHash {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A password that has been validated, but not yet hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPassword(String);

impl RawPassword {
    /// Create a new password from a string.
    ///
    /// # Errors
    /// Returns an [Error::InvalidPassword] if the password is shorter than
    /// the minimum length.
    pub fn new(raw_password_string: String) -> Result<Self, Error> {
        if raw_password_string.chars().count() < MIN_PASSWORD_LENGTH {
            Err(Error::InvalidPassword(format!(
                "passwords must be at least {MIN_PASSWORD_LENGTH} characters long"
            )))
        } else {
            Ok(Self(raw_password_string))
        }
    }

    /// Create a new `RawPassword` without any validation.
    ///
    /// This is intended for tests where costly validation is unnecessary.
    pub fn new_unchecked(raw_password_string: String) -> Self {
        Self(raw_password_string)
    }
}

impl AsRef<[u8]> for RawPassword {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}


#[cfg(test)]
mod raw_password_tests {
    use crate::{Error, models::RawPassword};

    #[test]
    fn new_fails_on_empty() {
        let result = RawPassword::new("".to_owned());

        assert!(matches!(result, Err(Error::InvalidPassword(_))));
    }

    #[test]
    fn new_fails_on_short_password() {
        let result = RawPassword::new("imtooshort".to_owned());

        assert!(matches!(result, Err(Error::InvalidPassword(_))));
    }

    #[test]
    fn new_succeeds_on_long_password() {
        let result = RawPassword::new("alongpassword1".to_owned());

        assert!(result.is_ok());
    }
}
