use std::path::Path;

use anyhow::Context;

use teller_parse::PayeeTable;

/// Runtime settings, all sourced from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub addr: String,
    pub api_base: String,
    pub token: String,
    pub api_key: Option<String>,
    pub utc_offset_hours: i32,
    pub rules_path: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let addr = std::env::var("TELLER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let api_base = std::env::var("LEDGER_API_BASE")
            .unwrap_or_else(|_| "https://api.ynab.com/v1".to_string());
        let token = std::env::var("LEDGER_TOKEN").context("LEDGER_TOKEN is not set")?;
        let api_key = std::env::var("TELLER_API_KEY").ok();
        let utc_offset_hours = match std::env::var("TELLER_UTC_OFFSET_HOURS") {
            Ok(raw) => raw
                .parse()
                .context("TELLER_UTC_OFFSET_HOURS must be an integer")?,
            Err(_) => -5,
        };
        let rules_path = std::env::var("TELLER_RULES").ok();
        Ok(Config {
            addr,
            api_base,
            token,
            api_key,
            utc_offset_hours,
            rules_path,
        })
    }
}

/// Loads the optional payee rule file; the built-in table applies when the
/// service runs without one.
pub fn load_payee_rules(path: &Path) -> anyhow::Result<PayeeTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rule file {}", path.display()))?;
    PayeeTable::from_toml(&content)
        .with_context(|| format!("invalid rule file {}", path.display()))
}
