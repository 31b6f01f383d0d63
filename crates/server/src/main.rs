use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use teller_ledger::LedgerClient;
use teller_parse::{FormatTable, ParseEngine, PayeeTable, SystemClock};

mod auth;
mod config;
mod routes;

pub struct AppState {
    pub engine: ParseEngine,
    pub ledger: LedgerClient,
    /// SHA-256 of the shared API key; `None` disables request auth.
    pub api_key_digest: Option<[u8; 32]>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = config::Config::from_env()?;

    let clock = SystemClock::from_offset_hours(cfg.utc_offset_hours)
        .context("TELLER_UTC_OFFSET_HOURS out of range")?;

    let payees = match &cfg.rules_path {
        Some(path) => {
            let table = config::load_payee_rules(Path::new(path))?;
            tracing::info!(%path, "loaded payee rules");
            table
        }
        None => PayeeTable::builtin(),
    };

    let engine = ParseEngine::new(FormatTable::builtin(), payees, Arc::new(clock));
    let ledger = LedgerClient::new(cfg.api_base.clone(), cfg.token.clone());

    let api_key_digest = cfg.api_key.as_deref().map(auth::digest);
    if let Some(digest) = &api_key_digest {
        tracing::info!(fingerprint = %hex::encode(&digest[..4]), "api key auth enabled");
    }

    let state = Arc::new(AppState {
        engine,
        ledger,
        api_key_digest,
    });
    let app = routes::router(state);

    tracing::info!(addr = %cfg.addr, "listening");
    let listener = tokio::net::TcpListener::bind(&cfg.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
