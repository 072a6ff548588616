//! Derived views over a user's transactions: income/expense/balance totals
//! and per-category expense rollups.

use std::collections::HashMap;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    auth::Claims,
    models::{Transaction, TransactionType},
    state::AppState,
    stores::TransactionStore,
};

/// The income, expense and balance totals over a set of transactions.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The sum of all income amounts.
    pub income: f64,
    /// The sum of all expense amounts.
    pub expense: f64,
    /// Income minus expense.
    pub balance: f64,
}

/// Sum `transactions` into income, expense and balance totals.
///
/// The result does not depend on the order of the transactions, and summing
/// an empty slice yields an all-zero summary.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut income = 0.0;
    let mut expense = 0.0;

    for transaction in transactions {
        match transaction.transaction_type() {
            TransactionType::Income => income += transaction.amount(),
            TransactionType::Expense => expense += transaction.amount(),
        }
    }

    Summary {
        income,
        expense,
        balance: income - expense,
    }
}

/// Total the expense amounts in `transactions` per category label.
///
/// Income transactions are excluded, category labels are matched exactly
/// (case-sensitive), and categories with no expenses are absent from the
/// result.
pub fn expense_by_category(transactions: &[Transaction]) -> HashMap<String, f64> {
    let mut totals = HashMap::new();

    for transaction in transactions {
        if transaction.transaction_type() != TransactionType::Expense {
            continue;
        }

        *totals
            .entry(transaction.category().to_owned())
            .or_insert(0.0) += transaction.amount();
    }

    totals
}

/// The response body for the summary endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    /// The overall income, expense and balance totals.
    #[serde(flatten)]
    pub summary: Summary,
    /// Expense totals per category label.
    pub categories: HashMap<String, f64>,
}

/// A route handler for the authenticated user's spending summary.
///
/// # Panics
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn get_summary(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<impl IntoResponse, Error> {
    let transactions = state.transaction_store.get_by_user(claims.user_id)?;

    Ok((
        StatusCode::OK,
        Json(SummaryResponse {
            summary: summarize(&transactions),
            categories: expense_by_category(&transactions),
        }),
    ))
}

#[cfg(test)]
mod aggregation_tests {
    use std::collections::HashMap;

    use chrono::{NaiveDate, Utc};

    use crate::{
        models::{Transaction, TransactionType, UserID},
        summary::{Summary, expense_by_category, summarize},
    };

    fn transaction(
        id: i64,
        amount: f64,
        transaction_type: TransactionType,
        category: &str,
    ) -> Transaction {
        Transaction::new(
            id,
            UserID::new(1),
            amount,
            transaction_type,
            category.to_owned(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn summarize_empty_slice_is_all_zero() {
        let summary = summarize(&[]);

        assert_eq!(
            summary,
            Summary {
                income: 0.0,
                expense: 0.0,
                balance: 0.0,
            }
        );
    }

    #[test]
    fn summarize_computes_totals_and_balance() {
        let transactions = vec![
            transaction(1, 100.0, TransactionType::Income, "salary"),
            transaction(2, 10.0, TransactionType::Expense, "food"),
            transaction(3, 5.0, TransactionType::Expense, "food"),
        ];

        let summary = summarize(&transactions);

        assert_eq!(summary.income, 100.0);
        assert_eq!(summary.expense, 15.0);
        assert_eq!(summary.balance, summary.income - summary.expense);
    }

    #[test]
    fn summarize_is_order_independent() {
        let mut transactions = vec![
            transaction(1, 100.0, TransactionType::Income, "salary"),
            transaction(2, 10.0, TransactionType::Expense, "food"),
            transaction(3, 5.0, TransactionType::Expense, "travel"),
        ];

        let summary = summarize(&transactions);
        transactions.reverse();
        let reversed_summary = summarize(&transactions);

        assert_eq!(summary, reversed_summary);
    }

    #[test]
    fn expense_by_category_sums_per_label_and_excludes_income() {
        let transactions = vec![
            transaction(1, 10.0, TransactionType::Expense, "food"),
            transaction(2, 5.0, TransactionType::Expense, "food"),
            transaction(3, 100.0, TransactionType::Income, "salary"),
        ];

        let totals = expense_by_category(&transactions);

        assert_eq!(totals, HashMap::from([("food".to_owned(), 15.0)]));
    }

    #[test]
    fn expense_by_category_matches_labels_exactly() {
        let transactions = vec![
            transaction(1, 10.0, TransactionType::Expense, "Food"),
            transaction(2, 5.0, TransactionType::Expense, "food"),
        ];

        let totals = expense_by_category(&transactions);

        assert_eq!(
            totals,
            HashMap::from([("Food".to_owned(), 10.0), ("food".to_owned(), 5.0)])
        );
    }

    #[test]
    fn expense_by_category_is_empty_without_expenses() {
        let transactions = vec![transaction(1, 100.0, TransactionType::Income, "salary")];

        assert_eq!(expense_by_category(&transactions), HashMap::new());
    }
}

#[cfg(test)]
mod summary_endpoint_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        auth::SignInResponse, build_router, endpoints, state::create_app_state, tips::TipsConfig,
    };

    fn get_test_server() -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = create_app_state(db_connection, "42", TipsConfig::default())
            .expect("Could not create app state.");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    async fn create_user_and_sign_in(server: &TestServer) -> String {
        let password = "averysafeandsecurepassword";

        server
            .post(endpoints::USERS)
            .content_type("application/json")
            .json(&json!({
                "name": "Test",
                "email": "test@test.com",
                "password": password,
            }))
            .await
            .assert_status_ok();

        server
            .post(endpoints::SIGN_IN)
            .content_type("application/json")
            .json(&json!({
                "email": "test@test.com",
                "password": password,
            }))
            .await
            .json::<SignInResponse>()
            .token
    }

    #[tokio::test]
    async fn get_summary_returns_totals_and_category_rollup() {
        let server = get_test_server();
        let token = create_user_and_sign_in(&server).await;

        for (amount, transaction_type, category) in [
            (100.0, "income", "salary"),
            (10.0, "expense", "food"),
            (5.0, "expense", "food"),
        ] {
            server
                .post(endpoints::TRANSACTIONS)
                .authorization_bearer(&token)
                .content_type("application/json")
                .json(&json!({
                    "amount": amount,
                    "type": transaction_type,
                    "category": category,
                    "date": "2024-05-01",
                }))
                .await
                .assert_status_ok();
        }

        let response = server
            .get(endpoints::SUMMARY)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["income"], 100.0);
        assert_eq!(body["expense"], 15.0);
        assert_eq!(body["balance"], 85.0);
        assert_eq!(body["categories"], json!({ "food": 15.0 }));
    }

    #[tokio::test]
    async fn get_summary_is_all_zero_without_transactions() {
        let server = get_test_server();
        let token = create_user_and_sign_in(&server).await;

        let response = server
            .get(endpoints::SUMMARY)
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["income"], 0.0);
        assert_eq!(body["balance"], 0.0);
        assert_eq!(body["categories"], json!({}));
    }

    #[tokio::test]
    async fn get_summary_fails_without_token() {
        let server = get_test_server();

        server
            .get(endpoints::SUMMARY)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
