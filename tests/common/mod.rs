//! Shared fixtures for integration tests.

use chrono::{DateTime, TimeDelta, Utc};
use dcabot::domain::engine::StrategyParams;
use dcabot::domain::error::DcaError;
use dcabot::domain::money::Money;
use dcabot::domain::quote::QuoteSnapshot;
use dcabot::ports::report_port::{ActionRow, ReportPort};
use dcabot::ports::stream_port::{QuoteHandler, StreamPort};

pub const BASE_SECS: i64 = 1_600_000_000;

/// Replays a fixed quote sequence, in order.
pub struct VecStream {
    quotes: Vec<QuoteSnapshot>,
}

impl VecStream {
    pub fn new(quotes: Vec<QuoteSnapshot>) -> Self {
        Self { quotes }
    }
}

impl StreamPort for VecStream {
    fn stream(&self, handler: &mut QuoteHandler) -> Result<(), DcaError> {
        for quote in &self.quotes {
            handler(quote)?;
        }
        Ok(())
    }
}

/// Collects report rows in memory.
#[derive(Default)]
pub struct CollectingReport {
    pub rows: Vec<ActionRow>,
}

impl ReportPort for CollectingReport {
    fn write_action(&mut self, row: &ActionRow) -> Result<(), DcaError> {
        self.rows.push(row.clone());
        Ok(())
    }
}

pub fn quote_at(price_major: f64, hours: i64) -> QuoteSnapshot {
    QuoteSnapshot {
        symbol: "SOL".into(),
        price: Money::from_major(price_major, "USD"),
        time: timestamp(hours),
    }
}

pub fn timestamp(hours: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(BASE_SECS + hours * 3600, 0).unwrap()
}

/// $1000 target, $100 per-trade limits, $2000 budget, $50 minimum profit,
/// one action per day at most.
pub fn sample_params() -> StrategyParams {
    StrategyParams {
        symbol: "SOL".into(),
        currency: "USD".into(),
        target_value: Money::new(100_000, "USD"),
        single_buy_limit_perc: 0.10,
        single_sell_limit_perc: 0.10,
        total_buy_limit_perc: 200.0,
        min_profit_perc: 0.05,
        min_transaction_span: TimeDelta::hours(24),
    }
}

/// One quote per day at the given prices.
pub fn daily_quotes(prices: &[f64]) -> Vec<QuoteSnapshot> {
    prices
        .iter()
        .enumerate()
        .map(|(day, &price)| quote_at(price, day as i64 * 24))
        .collect()
}
