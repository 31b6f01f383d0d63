use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Signed amount in the ledger's minor units: thousandths of the currency
/// unit. Debits are negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Milliunits(i64);

impl Milliunits {
    pub fn new(raw: i64) -> Self {
        Milliunits(raw)
    }

    pub fn raw(self) -> i64 {
        self.0
    }

    pub fn zero() -> Self {
        Milliunits(0)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_debit(self) -> bool {
        self.0 < 0
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(1000)
    }
}

impl fmt::Display for Milliunits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.to_decimal())
    }
}

impl Add for Milliunits {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Milliunits(self.0 + rhs.0)
    }
}

impl Sub for Milliunits {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Milliunits(self.0 - rhs.0)
    }
}

impl Neg for Milliunits {
    type Output = Self;
    fn neg(self) -> Self {
        Milliunits(-self.0)
    }
}
