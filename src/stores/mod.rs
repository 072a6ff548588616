//! Defines the store traits for the domain models and their SQLite
//! implementations.

pub mod sqlite;
mod transaction;
mod user;

pub use sqlite::{SQLiteTransactionStore, SQLiteUserStore};
pub use transaction::TransactionStore;
pub use user::UserStore;
