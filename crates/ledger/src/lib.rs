//! Ledger-submission client.
//!
//! Delivers finished [`TransactionRecord`]s to the budget API. Transport
//! only: no retries here. Parsing is deterministic and idempotent, so a
//! caller that wants redelivery simply re-posts the same notification.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use teller_core::TransactionRecord;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("ledger returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
}

/// Budget-API client (async, bearer-token auth).
#[derive(Clone)]
pub struct LedgerClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

/// Wire shape the budget API expects: the record nested under `transaction`.
#[derive(Debug, Serialize)]
struct SaveTransaction<'a> {
    transaction: &'a TransactionRecord,
}

impl LedgerClient {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("teller/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self {
            http,
            api_base: api_base.into(),
            token: token.into(),
        }
    }

    /// Creates one transaction in the given budget.
    pub async fn create_transaction(
        &self,
        budget_id: &str,
        record: &TransactionRecord,
    ) -> Result<(), LedgerError> {
        let url = format!("{}/budgets/{}/transactions", self.api_base, budget_id);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&SaveTransaction {
                transaction: record,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::Http {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(budget = budget_id, payee = %record.payee_name, "transaction submitted");
        Ok(())
    }
}
