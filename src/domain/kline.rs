//! Candlestick bar quote source.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::error::DcaError;
use crate::domain::money::Money;
use crate::domain::quote::Quote;

/// One candlestick over a sampling interval. All four price legs carry the
/// same currency by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Kline {
    pub symbol: String,
    pub open: Money,
    pub high: Money,
    pub low: Money,
    pub close: Money,
    pub open_time: DateTime<Utc>,
    pub close_time: DateTime<Utc>,
}

impl Kline {
    /// Parse one row of a Binance klines API response:
    /// `[open_time_ms, open, high, low, close, volume, close_time_ms, ...]`
    /// with prices as strings and 12 elements in total.
    pub fn from_binance(symbol: &str, currency: &str, row: &[Value]) -> Result<Kline, DcaError> {
        if row.len() != 12 {
            return Err(DcaError::KlineFormat {
                reason: format!("expected 12 kline fields, got {}", row.len()),
            });
        }
        Ok(Kline {
            symbol: symbol.to_string(),
            open: money_field(&row[1], currency)?,
            high: money_field(&row[2], currency)?,
            low: money_field(&row[3], currency)?,
            close: money_field(&row[4], currency)?,
            open_time: time_field(&row[0])?,
            close_time: time_field(&row[6])?,
        })
    }
}

fn money_field(value: &Value, currency: &str) -> Result<Money, DcaError> {
    let s = value.as_str().ok_or_else(|| DcaError::KlineFormat {
        reason: format!("expected price string, got {value}"),
    })?;
    let major: f64 = s.parse().map_err(|_| DcaError::KlineFormat {
        reason: format!("unparseable price {s:?}"),
    })?;
    Ok(Money::from_major(major, currency))
}

fn time_field(value: &Value) -> Result<DateTime<Utc>, DcaError> {
    let millis = value.as_i64().ok_or_else(|| DcaError::KlineFormat {
        reason: format!("expected epoch milliseconds, got {value}"),
    })?;
    DateTime::from_timestamp(millis / 1000, 0).ok_or_else(|| DcaError::KlineFormat {
        reason: format!("timestamp {millis} out of range"),
    })
}

impl Quote for Kline {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Average of open and close, split by the 50/50 allocation rule: the odd
    /// minor unit of the sum stays with the returned share.
    fn price(&self) -> Money {
        let sum = self.open.minor_units() + self.close.minor_units();
        Money::new(sum - sum / 2, self.open.currency())
    }

    /// Midpoint of the sampling interval.
    fn time(&self) -> DateTime<Utc> {
        self.open_time + (self.close_time - self.open_time) / 2
    }
}
