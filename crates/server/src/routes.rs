use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use teller_ledger::LedgerError;
use teller_parse::{CaptureSet, ParseError};

use crate::auth;
use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/ingest", post(ingest))
        .route("/transactions", post(add_transaction))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug)]
pub enum AppError {
    Unauthorized,
    Parse(ParseError),
    Ledger(LedgerError),
}

impl From<ParseError> for AppError {
    fn from(e: ParseError) -> Self {
        AppError::Parse(e)
    }
}

impl From<LedgerError> for AppError {
    fn from(e: LedgerError) -> Self {
        AppError::Ledger(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "invalid api key").into_response()
            }
            AppError::Parse(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            AppError::Ledger(e) => {
                tracing::error!(error = %e, "ledger submission failed");
                (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
            }
        }
    }
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestQuery {
    pub budget_id: String,
    /// Fallback for format rules without a static account binding.
    pub account_id: Option<String>,
}

/// POST /ingest: raw notification body in, one ledger transaction out.
async fn ingest(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IngestQuery>,
    headers: HeaderMap,
    body: String,
) -> Result<StatusCode, AppError> {
    auth::require_key(&headers, state.api_key_digest.as_ref())?;

    let request_id = uuid::Uuid::new_v4();
    let record = state
        .engine
        .parse(&body, query.account_id.as_deref())
        .inspect_err(|e| {
            if matches!(e, ParseError::NoFormatMatched) {
                // Keep the full text: an unrecognized format is the signal
                // that the rule table needs a new entry.
                tracing::warn!(%request_id, text = %body, "unrecognized notification format");
            }
        })?;

    tracing::info!(
        %request_id,
        account = %record.account_id,
        payee = %record.payee_name,
        amount = %record.amount,
        "parsed notification"
    );

    state
        .ledger
        .create_transaction(&query.budget_id, &record)
        .await?;
    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTransactionQuery {
    pub budget_id: String,
    pub account_id: String,
    pub who: String,
    pub when: String,
    #[serde(rename = "where")]
    pub location: String,
    pub amount: String,
}

/// POST /transactions: the pre-split variant. The caller already holds the
/// four raw field values, so only the normalization half of the engine runs.
/// Missing query fields are rejected by extraction before we get here.
async fn add_transaction(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AddTransactionQuery>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    auth::require_key(&headers, state.api_key_digest.as_ref())?;

    let captures = CaptureSet {
        who: query.who,
        when: query.when,
        location: query.location,
        amount: Some(query.amount),
    };
    let record = state.engine.build_from_fields(&query.account_id, &captures)?;
    state
        .ledger
        .create_transaction(&query.budget_id, &record)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use teller_ledger::LedgerClient;
    use teller_parse::{FixedClock, ParseEngine};
    use tower::ServiceExt;

    fn state(api_key: Option<&str>) -> Arc<AppState> {
        let offset = chrono::FixedOffset::west_opt(5 * 3600).unwrap();
        let clock = FixedClock::from_epoch_millis(1_586_389_116_831, offset).unwrap();
        Arc::new(AppState {
            engine: ParseEngine::with_builtin_rules(Arc::new(clock)),
            // Never reached in these tests; parse failures reject first.
            ledger: LedgerClient::new("http://127.0.0.1:1", "test-token"),
            api_key_digest: api_key.map(crate::auth::digest),
        })
    }

    #[tokio::test]
    async fn healthz_is_open() {
        let response = router(state(Some("sekrit")))
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn ingest_without_key_is_unauthorized() {
        let response = router(state(Some("sekrit")))
            .oneshot(
                Request::post("/ingest?budgetId=b1")
                    .body(Body::from("anything"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unrecognized_notification_is_bad_request() {
        let response = router(state(None))
            .oneshot(
                Request::post("/ingest?budgetId=b1")
                    .body(Body::from("You have a package waiting"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn add_transaction_requires_all_fields() {
        // `amount` missing → query extraction rejects with 400.
        let response = router(state(None))
            .oneshot(
                Request::post("/transactions?budgetId=b1&accountId=a1&who=1234&when=8/5/1972&where=Lounge")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
