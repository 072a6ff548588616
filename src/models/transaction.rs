//! This file defines the type `Transaction`, the core type of the ledger.

use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    models::{DatabaseID, UserID},
};

/// Whether a transaction records money earned or money spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The string stored in the database for this transaction type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(Error::InvalidTransactionType(other.to_owned())),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or
/// earned, owned by a single user.
///
/// To create a new `Transaction` use
/// [TransactionStore::create](crate::stores::TransactionStore::create).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    id: DatabaseID,
    user_id: UserID,
    amount: f64,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    category: String,
    date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Note that this does *not* add the transaction to the application
    /// database; it is intended for code mapping database rows back into
    /// transactions.
    pub fn new(
        id: DatabaseID,
        user_id: UserID,
        amount: f64,
        transaction_type: TransactionType,
        category: String,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            amount,
            transaction_type,
            category,
            date,
            created_at,
        }
    }

    /// The ID of the transaction.
    pub fn id(&self) -> DatabaseID {
        self.id
    }

    /// The ID of the user that owns this transaction.
    pub fn user_id(&self) -> UserID {
        self.user_id
    }

    /// The amount of money spent or earned in this transaction.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Whether the transaction is income or an expense.
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    /// A user-defined label that groups related transactions.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// When the transaction happened.
    pub fn date(&self) -> &NaiveDate {
        &self.date
    }

    /// When the transaction was recorded, used as the default listing order.
    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }
}

/// The client-supplied data for creating a new transaction.
///
/// Deliberately carries no owner field: the owner is always the
/// authenticated user, and anything else the client sends is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    /// The amount of money earned or spent.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// A free-text label that groups related transactions.
    pub category: String,
    /// The calendar date the transaction took place.
    pub date: NaiveDate,
}

impl NewTransaction {
    /// Check the data against the ledger's validation rules.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAmount] if the amount is negative, NaN or infinite,
    /// - or [Error::EmptyCategory] if the category contains no
    ///   non-whitespace characters.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(Error::InvalidAmount);
        }

        if self.category.trim().is_empty() {
            return Err(Error::EmptyCategory);
        }

        Ok(())
    }
}

#[cfg(test)]
mod transaction_type_tests {
    use crate::{Error, models::TransactionType};

    #[test]
    fn serializes_as_lowercase() {
        assert_eq!(
            serde_json::to_string(&TransactionType::Income).unwrap(),
            "\"income\""
        );
        assert_eq!(
            serde_json::to_string(&TransactionType::Expense).unwrap(),
            "\"expense\""
        );
    }

    #[test]
    fn parses_from_database_strings() {
        assert_eq!("income".parse(), Ok(TransactionType::Income));
        assert_eq!("expense".parse(), Ok(TransactionType::Expense));
    }

    #[test]
    fn parse_fails_on_unknown_string() {
        let result: Result<TransactionType, Error> = "transfer".parse();

        assert_eq!(
            result,
            Err(Error::InvalidTransactionType("transfer".to_owned()))
        );
    }
}
