//! The API endpoint URIs.

/// The root route, used as a liveness check.
pub const ROOT: &str = "/";
/// The route for registering a new user.
pub const USERS: &str = "/users";
/// The route for signing in a user.
pub const SIGN_IN: &str = "/sign_in";
/// The route to access the authenticated user's transactions.
pub const TRANSACTIONS: &str = "/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/transactions/{transaction_id}";
/// The route for the authenticated user's spending summary.
pub const SUMMARY: &str = "/summary";
/// The route for fetching budgeting tips.
pub const TIPS: &str = "/tips";
