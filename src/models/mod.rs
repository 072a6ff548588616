//! The domain models of the application.

mod password;
mod transaction;
mod user;

pub use password::{PasswordHash, RawPassword};
pub use transaction::{NewTransaction, Transaction, TransactionType};
pub use user::{NewUser, User, UserID};

/// An alias for the integer type used for database row IDs.
pub type DatabaseID = i64;
