//! This file defines a user of the application and its supporting types.

use std::fmt::Display;

use email_address::EmailAddress;
use serde::{Deserialize, Serialize};

use crate::models::PasswordHash;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to
/// better compile time errors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Create a user ID from a database row ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The underlying integer ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// The password hash is excluded from serialization so that API responses
/// never leak it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    id: UserID,
    email: EmailAddress,
    name: String,
    #[serde(skip_serializing)]
    password_hash: PasswordHash,
}

impl User {
    /// Create a new user.
    ///
    /// Note that this does *not* add the user to the application database,
    /// see [UserStore::create](crate::stores::UserStore::create) for that.
    pub fn new(id: UserID, email: EmailAddress, name: String, password_hash: PasswordHash) -> Self {
        Self {
            id,
            email,
            name,
            password_hash,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The email address associated with the user.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The user's display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The user's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

/// The data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// The email address to register.
    pub email: EmailAddress,
    /// The display name for the new account.
    pub name: String,
    /// The hash of the account's password.
    pub password_hash: PasswordHash,
}

#[cfg(test)]
mod user_tests {
    use std::str::FromStr;

    use email_address::EmailAddress;

    use crate::models::{PasswordHash, User, UserID};

    #[test]
    fn serialized_user_does_not_contain_password_hash() {
        let user = User::new(
            UserID::new(1),
            EmailAddress::from_str("foo@bar.baz").unwrap(),
            "Foo".to_owned(),
            PasswordHash::new_unchecked("definitelyapasswordhash".to_owned()),
        );

        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["email"], "foo@bar.baz");
        assert_eq!(json["name"], "Foo");
        assert!(json.get("password_hash").is_none());
    }
}
