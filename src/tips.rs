//! The advisory tips gateway: turns a set of transactions into budgeting
//! suggestions via an external text generator.
//!
//! The gateway is best-effort by design. A missing API key, a network
//! failure, a timeout or a malformed completion all degrade to a fixed
//! fallback suggestion; they never fail the surrounding request.

use std::time::Duration;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{models::TransactionType, state::AppState};

/// The suggestion returned in mock mode.
const MOCK_TIP: &str = "Mock tip: try reducing food and entertainment expenses to save more.";

/// The suggestion returned when the external generator cannot be reached.
const FALLBACK_TIP: &str = "Reduce high expenses like dining out and shopping to save more.";

/// The default base URL of the external generator's API.
const DEFAULT_API_URL: &str = "https://api.openai.com/v1";

/// The model requested from the external generator.
const MODEL: &str = "gpt-4o-mini";

/// The upper bound on the length of a generated suggestion, in tokens.
const MAX_COMPLETION_TOKENS: u32 = 200;

/// How long to wait for the external generator before falling back.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for the [TipsGateway].
#[derive(Debug, Clone, Default)]
pub struct TipsConfig {
    /// The API key for the external generator. Without one the gateway
    /// always takes the fallback path.
    pub api_key: Option<String>,
    /// Overrides the base URL of the external generator's API.
    pub api_url: Option<String>,
    /// When set, return a fixed suggestion without contacting the external
    /// generator.
    pub mock: bool,
}

/// A transaction as presented to the tips generator.
///
/// Carries only the fields the prompt needs; anything else the client sends
/// (IDs, owners, dates) is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipsTransaction {
    /// The category label of the transaction.
    pub category: String,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// The amount of money earned or spent.
    pub amount: f64,
}

/// The outcome of asking the gateway for budgeting tips.
///
/// Fallback content is distinguished from generated content so that callers
/// and tests can tell a real suggestion from the canned one.
#[derive(Debug, Clone, PartialEq)]
pub enum TipsOutcome {
    /// A suggestion produced by the external generator or the mock mode.
    Generated(String),
    /// The canned suggestion used when the generator is unavailable.
    Fallback(String),
}

/// The errors that may occur while querying the external generator.
///
/// These never escape the gateway; they are logged and folded into
/// [TipsOutcome::Fallback].
#[derive(Debug, thiserror::Error)]
enum TipsError {
    #[error("could not reach the tips generator: {0}")]
    Http(#[from] reqwest::Error),

    #[error("the tips generator returned no completion")]
    EmptyCompletion,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Produces budgeting suggestions for a set of transactions.
#[derive(Debug, Clone)]
pub struct TipsGateway {
    http: reqwest::Client,
    config: TipsConfig,
}

impl TipsGateway {
    /// Create a gateway for the given `config`.
    ///
    /// Requests to the external generator are bounded by a timeout; a
    /// generator that takes longer is treated as unavailable.
    ///
    /// # Panics
    /// Panics if the underlying HTTP client cannot be constructed.
    pub fn new(config: TipsConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Could not create the HTTP client for the tips gateway.");

        Self { http, config }
    }

    /// Ask for budgeting suggestions over `transactions`.
    ///
    /// Always produces a suggestion: if the external generator is
    /// unconfigured, unreachable or returns garbage, the result is the
    /// fallback outcome rather than an error.
    pub async fn get_tips(&self, transactions: &[TipsTransaction]) -> TipsOutcome {
        if self.config.mock {
            return TipsOutcome::Generated(MOCK_TIP.to_owned());
        }

        let Some(api_key) = &self.config.api_key else {
            tracing::warn!("No tips generator API key is configured, using the fallback tip.");
            return TipsOutcome::Fallback(FALLBACK_TIP.to_owned());
        };

        match self.request_tips(&build_prompt(transactions), api_key).await {
            Ok(tips) => TipsOutcome::Generated(tips),
            Err(error) => {
                tracing::warn!("Could not fetch tips from the generator: {error}");
                TipsOutcome::Fallback(FALLBACK_TIP.to_owned())
            }
        }
    }

    async fn request_tips(&self, prompt: &str, api_key: &str) -> Result<String, TipsError> {
        let api_url = self.config.api_url.as_deref().unwrap_or(DEFAULT_API_URL);

        let request = ChatRequest {
            model: MODEL,
            messages: vec![ChatMessage {
                role: "user".to_owned(),
                content: prompt.to_owned(),
            }],
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        let response = self
            .http
            .post(format!("{api_url}/chat/completions"))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(TipsError::EmptyCompletion)
    }
}

/// Build the natural-language description of `transactions` that is
/// submitted to the external generator.
fn build_prompt(transactions: &[TipsTransaction]) -> String {
    let transaction_lines = transactions
        .iter()
        .map(|transaction| {
            format!(
                "Category: {}, Type: {}, Amount: {}",
                transaction.category, transaction.transaction_type, transaction.amount
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "I have the following transactions:\n{transaction_lines}\nGive me personalized budget tips based on this spending."
    )
}

/// The request body for the tips endpoint.
#[derive(Debug, Deserialize)]
pub struct TipsRequest {
    /// The transactions to base the suggestions on.
    pub transactions: Vec<TipsTransaction>,
}

/// How the suggestion in a [TipsResponse] was produced.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryStatus {
    /// The suggestion came from the external generator or the mock mode.
    Generated,
    /// The external generator was unavailable and the canned fallback was
    /// used instead.
    Unavailable,
}

/// The response body for the tips endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct TipsResponse {
    /// The budgeting suggestion.
    pub tips: String,
    /// Whether the suggestion was generated or is the canned fallback.
    pub advisory: AdvisoryStatus,
}

/// A route handler for fetching budgeting tips for a set of transactions.
///
/// Returns 400 if the request body is missing a well-formed `transactions`
/// sequence. Generator failures do not fail the request: the response then
/// carries the fallback suggestion and an `unavailable` advisory status.
pub async fn get_tips(
    State(state): State<AppState>,
    payload: Result<Json<TipsRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(Json(request)) = payload else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "transactions data required" })),
        )
            .into_response();
    };

    let (tips, advisory) = match state.tips_gateway.get_tips(&request.transactions).await {
        TipsOutcome::Generated(tips) => (tips, AdvisoryStatus::Generated),
        TipsOutcome::Fallback(tips) => (tips, AdvisoryStatus::Unavailable),
    };

    (StatusCode::OK, Json(TipsResponse { tips, advisory })).into_response()
}


#[cfg(test)]
mod tips_endpoint_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::json;

    use crate::{
        build_router, endpoints,
        state::create_app_state,
        tips::{AdvisoryStatus, TipsConfig, TipsResponse},
    };

    fn get_test_server(tips_config: TipsConfig) -> TestServer {
        let db_connection =
            Connection::open_in_memory().expect("Could not open database in memory.");
        let state = create_app_state(db_connection, "42", tips_config)
            .expect("Could not create app state.");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn get_tips_returns_mock_tip_in_mock_mode() {
        let server = get_test_server(TipsConfig {
            mock: true,
            ..Default::default()
        });

        let response = server
            .post(endpoints::TIPS)
            .content_type("application/json")
            .json(&json!({
                "transactions": [
                    { "category": "food", "type": "expense", "amount": 10.0 },
                ],
            }))
            .await;

        response.assert_status_ok();

        let body = response.json::<TipsResponse>();
        assert_eq!(body.advisory, AdvisoryStatus::Generated);
        assert!(!body.tips.is_empty());
    }

    #[tokio::test]
    async fn get_tips_falls_back_when_generator_is_unavailable() {
        let server = get_test_server(TipsConfig {
            api_key: Some("test-key".to_owned()),
            api_url: Some("http://127.0.0.1:9".to_owned()),
            mock: false,
        });

        let response = server
            .post(endpoints::TIPS)
            .content_type("application/json")
            .json(&json!({
                "transactions": [
                    { "category": "food", "type": "expense", "amount": 10.0 },
                ],
            }))
            .await;

        // Generator failures must not fail the request.
        response.assert_status_ok();

        let body = response.json::<TipsResponse>();
        assert_eq!(body.advisory, AdvisoryStatus::Unavailable);
        assert!(!body.tips.is_empty());
    }

    #[tokio::test]
    async fn get_tips_accepts_full_transaction_records() {
        let server = get_test_server(TipsConfig {
            mock: true,
            ..Default::default()
        });

        // Clients send their transaction list as-is; extra fields such as
        // IDs and dates are ignored.
        server
            .post(endpoints::TIPS)
            .content_type("application/json")
            .json(&json!({
                "transactions": [
                    {
                        "id": 1,
                        "user_id": 1,
                        "category": "food",
                        "type": "expense",
                        "amount": 10.0,
                        "date": "2024-05-01",
                        "created_at": "2024-05-01T12:00:00Z",
                    },
                ],
            }))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn get_tips_fails_on_missing_transactions() {
        let server = get_test_server(TipsConfig::default());

        server
            .post(endpoints::TIPS)
            .content_type("application/json")
            .json(&json!({}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_tips_fails_on_malformed_transactions() {
        let server = get_test_server(TipsConfig::default());

        server
            .post(endpoints::TIPS)
            .content_type("application/json")
            .json(&json!({ "transactions": "not a sequence" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_tips_succeeds_on_empty_transactions() {
        let server = get_test_server(TipsConfig {
            mock: true,
            ..Default::default()
        });

        server
            .post(endpoints::TIPS)
            .content_type("application/json")
            .json(&json!({ "transactions": [] }))
            .await
            .assert_status_ok();
    }
}
