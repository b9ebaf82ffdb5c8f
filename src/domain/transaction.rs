//! Executed buy/sell record.

use chrono::{DateTime, Utc};

use crate::domain::money::Money;

/// One accepted trade. Positive amount/value is a buy (cash outflow),
/// negative is a sell (cash inflow). Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Asset units moved, signed.
    pub amount: f64,
    /// Monetary value moved, signed.
    pub value: Money,
    /// Reserved; always zero today.
    pub fee: Money,
    /// Wall-clock time of execution.
    pub time: DateTime<Utc>,
}

impl Transaction {
    pub fn is_sell(&self) -> bool {
        self.value.is_negative()
    }

    pub fn is_buy(&self) -> bool {
        !self.is_sell()
    }
}
