use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::Milliunits;

/// A normalized transaction, ready for ledger submission.
///
/// Constructed whole or not at all: the parsing pipeline never emits a
/// partially filled record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Opaque identifier of the ledger account the notification belongs to.
    pub account_id: String,
    pub date: NaiveDate,
    /// Signed minor units; captured notification amounts are always debits.
    pub amount: Milliunits,
    pub payee_name: String,
    /// Free text; starts with the wall-clock `HH:MM` the record was built at.
    pub memo: String,
    pub approved: bool,
}
