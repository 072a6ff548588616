//! Application router configuration.

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::{
    auth::sign_in,
    endpoints,
    register_user::register_user,
    state::AppState,
    summary::get_summary,
    tips::get_tips,
    transaction::{create_transaction, delete_transaction, get_transactions},
};

/// Return a router with all the app's routes.
///
/// The transaction and summary routes require a bearer token; registration,
/// sign-in and the tips route do not.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index))
        .route(endpoints::USERS, post(register_user))
        .route(endpoints::SIGN_IN, post(sign_in))
        .route(
            endpoints::TRANSACTIONS,
            post(create_transaction).get(get_transactions),
        )
        .route(endpoints::TRANSACTION, delete(delete_transaction))
        .route(endpoints::SUMMARY, get(get_summary))
        .route(endpoints::TIPS, post(get_tips))
        .with_state(state)
}

/// A route handler confirming that the API is up.
async fn get_index() -> &'static str {
    "Finance Tracker API running"
}

#[cfg(test)]
mod routing_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{build_router, endpoints, state::create_app_state, tips::TipsConfig};

    #[tokio::test]
    async fn index_confirms_the_api_is_up() {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = create_app_state(db_connection, "42", TipsConfig::default())
            .expect("Could not create app state.");
        let server = TestServer::try_new(build_router(state)).expect("Could not create test server.");

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        response.assert_text("Finance Tracker API running");
    }
}
