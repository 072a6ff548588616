//! Defines the transaction store trait.

use crate::{
    Error,
    models::{DatabaseID, NewTransaction, Transaction, UserID},
};

/// Handles the creation, retrieval and deletion of transactions.
pub trait TransactionStore {
    /// Create a new transaction in the store, owned by `owner`.
    ///
    /// # Errors
    /// Returns an [Error::InvalidAmount] or [Error::EmptyCategory] if `data`
    /// violates the ledger's validation rules. Nothing is persisted in that
    /// case.
    fn create(&mut self, owner: UserID, data: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store by its `id`.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if `id` does not refer to a transaction.
    fn get(&self, id: DatabaseID) -> Result<Transaction, Error>;

    /// Retrieve the transactions owned by `user_id`, most recently recorded
    /// first.
    ///
    /// An empty vector is returned if the specified user has no transactions.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;

    /// Delete the transaction with `id`.
    ///
    /// This function does **not** check ownership: callers must confirm that
    /// the transaction belongs to the requesting user first.
    ///
    /// # Errors
    /// Returns an [Error::NotFound] if `id` does not refer to a transaction.
    fn delete(&mut self, id: DatabaseID) -> Result<(), Error>;
}
