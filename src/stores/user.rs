//! Defines the user store trait.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{NewUser, User},
};

/// Handles the creation and retrieval of user accounts.
pub trait UserStore {
    /// Create a new user in the store.
    ///
    /// # Errors
    /// Returns an [Error::DuplicateEmail] if the email address is already
    /// registered. Email comparison is case-insensitive.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error>;

    /// Retrieve the user that has the given `email` address.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if no user has that email address.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error>;
}
