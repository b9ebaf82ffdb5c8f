//! Quote capability consumed by the engine.

use chrono::{DateTime, Utc};

use crate::domain::money::Money;

/// A read-only price observation for one sampling interval.
///
/// Any data source exposing these three accessors can drive the engine; the
/// engine never sees source-format fields such as OHLC legs.
pub trait Quote {
    fn symbol(&self) -> &str;
    /// Representative price for the interval.
    fn price(&self) -> Money;
    /// Temporal midpoint of the interval, not its start.
    fn time(&self) -> DateTime<Utc>;
}

/// Owned copy of the quote fields the engine keeps after acting on it.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub price: Money,
    pub time: DateTime<Utc>,
}

impl QuoteSnapshot {
    pub fn of(quote: &dyn Quote) -> Self {
        QuoteSnapshot {
            symbol: quote.symbol().to_string(),
            price: quote.price(),
            time: quote.time(),
        }
    }
}

impl Quote for QuoteSnapshot {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn price(&self) -> Money {
        self.price.clone()
    }

    fn time(&self) -> DateTime<Utc> {
        self.time
    }
}
