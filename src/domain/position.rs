//! Running position state for one strategy.

use chrono::{DateTime, Utc};

use crate::domain::error::DcaError;
use crate::domain::money::Money;
use crate::domain::quote::QuoteSnapshot;
use crate::domain::transaction::Transaction;

/// Holdings, cash and cumulative statistics. Mutated only through
/// [`Position::apply`]; everything else reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Asset units currently held.
    pub asset_amount: f64,
    /// Cumulative value of all transactions, buys minus sells. The budget
    /// ceiling check runs against this, not against current holdings.
    pub bought_value: Money,
    /// Cash remaining; not the total value of the position.
    pub cash: Money,

    pub last_transaction: Option<Transaction>,
    pub last_acted_quote: Option<QuoteSnapshot>,

    pub buy_count: u32,
    pub sell_count: u32,
    pub buy_amount: f64,
    pub sell_amount: f64,
    pub buy_value: Money,
    pub sell_value: Money,
}

impl Position {
    /// Fresh position holding `opening_cash` and nothing else.
    pub fn new(currency: &str, opening_cash: Money) -> Self {
        Position {
            asset_amount: 0.0,
            bought_value: Money::zero(currency),
            cash: opening_cash,
            last_transaction: None,
            last_acted_quote: None,
            buy_count: 0,
            sell_count: 0,
            buy_amount: 0.0,
            sell_amount: 0.0,
            buy_value: Money::zero(currency),
            sell_value: Money::zero(currency),
        }
    }

    pub fn last_acted_time(&self) -> Option<DateTime<Utc>> {
        self.last_acted_quote.as_ref().map(|q| q.time)
    }

    pub fn last_transaction_time(&self) -> Option<DateTime<Utc>> {
        self.last_transaction.as_ref().map(|t| t.time)
    }

    /// Record an accepted transaction against the quote it acted on.
    ///
    /// All fallible monetary arithmetic runs before the first field write, so
    /// a failure leaves the position exactly as it was.
    pub fn apply(&mut self, tx: Transaction, quote: QuoteSnapshot) -> Result<(), DcaError> {
        let bought_value = self.bought_value.add(&tx.value)?;
        let cash = self.cash.subtract(&tx.value)?;
        let sold = tx.value.is_negative();
        let side_value = if sold {
            self.sell_value.subtract(&tx.value)?
        } else {
            self.buy_value.add(&tx.value)?
        };

        self.asset_amount += tx.amount;
        self.bought_value = bought_value;
        self.cash = cash;
        if sold {
            self.sell_count += 1;
            self.sell_amount -= tx.amount;
            self.sell_value = side_value;
        } else {
            self.buy_count += 1;
            self.buy_amount += tx.amount;
            self.buy_value = side_value;
        }
        self.last_acted_quote = Some(quote);
        self.last_transaction = Some(tx);
        Ok(())
    }
}
