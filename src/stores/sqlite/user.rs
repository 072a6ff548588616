//! Implements a SQLite backed user store.

use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, Row};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{NewUser, PasswordHash, User, UserID},
    stores::UserStore,
};

/// Stores user accounts in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl UserStore for SQLiteUserStore {
    /// Create a new user in the database.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DuplicateEmail] if the email address is already registered
    ///   (comparison is case-insensitive),
    /// - or [Error::SqlError] if there is some other SQL error.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the
    /// same thread.
    fn create(&mut self, new_user: NewUser) -> Result<User, Error> {
        let connection = self.connection.lock().unwrap();

        connection.execute(
            "INSERT INTO user (email, name, password) VALUES (?1, ?2, ?3)",
            (
                new_user.email.to_string(),
                &new_user.name,
                new_user.password_hash.to_string(),
            ),
        )?;

        let id = UserID::new(connection.last_insert_rowid());

        Ok(User::new(
            id,
            new_user.email,
            new_user.name,
            new_user.password_hash,
        ))
    }

    /// Get the user from the database that has the specified `email` address.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if no user has that email address,
    /// - or [Error::SqlError] if there is some other SQL error.
    ///
    /// # Panics
    /// Panics if the lock for the database connection is already held by the
    /// same thread.
    fn get_by_email(&self, email: &EmailAddress) -> Result<User, Error> {
        let email = email.to_string();

        let user = self
            .connection
            .lock()
            .unwrap()
            .prepare("SELECT id, email, name, password FROM user WHERE email = :email")?
            .query_row(&[(":email", &email)], Self::map_row)?;

        Ok(user)
    }
}

impl CreateTable for SQLiteUserStore {
    fn create_table(connection: &Connection) -> Result<(), Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    email TEXT COLLATE NOCASE UNIQUE NOT NULL,
                    name TEXT NOT NULL,
                    password TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for SQLiteUserStore {
    type ReturnType = User;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let id = UserID::new(row.get(offset)?);
        let raw_email: String = row.get(offset + 1)?;
        let name = row.get(offset + 2)?;
        let password_hash = PasswordHash::new_unchecked(row.get(offset + 3)?);

        let email = EmailAddress::new_unchecked(raw_email);

        Ok(User::new(id, email, name, password_hash))
    }
}
