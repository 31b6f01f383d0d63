use std::sync::Arc;

use teller_core::TransactionRecord;

use crate::clock::Clock;
use crate::error::ParseError;
use crate::matcher::{CaptureSet, FormatTable};
use crate::normalize;
use crate::payee::PayeeTable;

/// The notification-parsing engine: format matching, field normalization
/// and payee canonicalization behind one entry point.
///
/// Holds only immutable rule tables and an injected clock, so a single
/// instance is shared freely across concurrent requests.
pub struct ParseEngine {
    formats: FormatTable,
    payees: PayeeTable,
    clock: Arc<dyn Clock>,
}

impl ParseEngine {
    pub fn new(formats: FormatTable, payees: PayeeTable, clock: Arc<dyn Clock>) -> Self {
        Self {
            formats,
            payees,
            clock,
        }
    }

    pub fn with_builtin_rules(clock: Arc<dyn Clock>) -> Self {
        Self::new(FormatTable::builtin(), PayeeTable::builtin(), clock)
    }

    /// Parses one raw notification body into a ledger-ready record.
    ///
    /// `fallback_account` is only consulted when the matched rule carries no
    /// static account binding.
    pub fn parse(
        &self,
        text: &str,
        fallback_account: Option<&str>,
    ) -> Result<TransactionRecord, ParseError> {
        let matched = self.formats.match_text(text)?;
        let account_id = matched
            .rule
            .account_id
            .map(str::to_string)
            .or_else(|| fallback_account.map(str::to_string))
            .ok_or(ParseError::MissingField("account"))?;
        tracing::debug!(rule = matched.rule.name, account = %account_id, "notification matched");
        self.build(account_id, &matched.captures)
    }

    /// Builds a record from pre-split fields, skipping format matching.
    ///
    /// For callers that already hold the raw field values and only need the
    /// normalization half of the pipeline.
    pub fn build_from_fields(
        &self,
        account_id: &str,
        captures: &CaptureSet,
    ) -> Result<TransactionRecord, ParseError> {
        self.build(account_id.to_string(), captures)
    }

    fn build(
        &self,
        account_id: String,
        captures: &CaptureSet,
    ) -> Result<TransactionRecord, ParseError> {
        let date = normalize::normalize_date(&captures.when, self.clock.current_year())?;
        let amount = normalize::normalize_amount(captures.amount.as_deref())?;
        let payee = self.payees.normalize(&captures.location);
        let memo = normalize::compose_memo(self.clock.now(), &captures.who);
        Ok(TransactionRecord {
            account_id,
            date,
            amount,
            payee_name: payee.name,
            memo,
            approved: payee.trusted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::matcher::{FieldBinding, FieldMap, FormatRule};
    use chrono::FixedOffset;

    // 2020-04-08T23:38:36.831Z, displayed at UTC-5 → 18:38, year 2020.
    fn engine() -> ParseEngine {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let clock = FixedClock::from_epoch_millis(1_586_389_116_831, offset).unwrap();
        ParseEngine::with_builtin_rules(Arc::new(clock))
    }

    #[test]
    fn rule_bound_account_wins_over_caller_fallback() {
        let record = engine()
            .parse(
                "Card ending in 1234\non 8/5/1972, at Who's Lounge, in the amount of $452.99",
                Some("caller-account"),
            )
            .unwrap();
        assert_eq!(record.account_id, "a90346df-e8d2-4b12-b534-3d90d15dcf5a");
    }

    #[test]
    fn unbound_rule_uses_caller_account() {
        let rules = vec![FormatRule {
            name: "unbound",
            account_id: None,
            pattern: r"(?s)spent (\S+) at (.*) on (\d{1,2}/\d{1,2}/\d{4}) card (\d+)",
            fields: FieldMap {
                who: FieldBinding::Slot(4),
                when: FieldBinding::Slot(3),
                location: FieldBinding::Slot(2),
                amount: Some(FieldBinding::Slot(1)),
            },
        }];
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let clock = FixedClock::from_epoch_millis(1_586_389_116_831, offset).unwrap();
        let engine = ParseEngine::new(
            FormatTable::new(rules).unwrap(),
            PayeeTable::builtin(),
            Arc::new(clock),
        );

        let text = "spent $9.99 at Corner Cafe on 4/8/2020 card 5678";
        let record = engine.parse(text, Some("caller-account")).unwrap();
        assert_eq!(record.account_id, "caller-account");

        let err = engine.parse(text, None).unwrap_err();
        assert_eq!(err, ParseError::MissingField("account"));
    }

    #[test]
    fn build_from_fields_skips_matching() {
        let captures = CaptureSet {
            who: "1234".to_string(),
            when: "8/5/1972".to_string(),
            location: "Who's Lounge".to_string(),
            amount: Some("$452.99".to_string()),
        };
        let record = engine().build_from_fields("direct-account", &captures).unwrap();
        assert_eq!(record.account_id, "direct-account");
        assert_eq!(record.date.to_string(), "1972-08-05");
        assert_eq!(record.amount.raw(), -452_990);
        assert_eq!(record.memo, "18:38 1234");
        assert!(!record.approved);
    }
}
