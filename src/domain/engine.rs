//! DCA decision engine.
//!
//! One [`StrategyEngine`] owns one [`Position`] and decides, quote by quote,
//! whether to buy toward the target value or sell the excess above it, within
//! per-trade and total budget limits and a minimum span between actions.

use std::cmp::Ordering;

use chrono::{TimeDelta, Utc};
use log::{debug, warn};

use crate::domain::error::DcaError;
use crate::domain::money::{allocate_percent, Money};
use crate::domain::position::Position;
use crate::domain::quote::{Quote, QuoteSnapshot};
use crate::domain::transaction::Transaction;

/// Strategy parameters, immutable after construction.
///
/// Percentage fields accept either a fraction up to 1 (`0.10` = 10%) or a
/// whole percentage above 1 (`200` = 200%); both forms normalize identically.
#[derive(Debug, Clone)]
pub struct StrategyParams {
    pub symbol: String,
    pub currency: String,
    /// Desired steady-state value of the held asset.
    pub target_value: Money,
    pub single_buy_limit_perc: f64,
    pub single_sell_limit_perc: f64,
    /// Ceiling on cumulative bought value, as a percentage of the target.
    /// May exceed 100%.
    pub total_buy_limit_perc: f64,
    pub min_profit_perc: f64,
    /// Cooldown between acted-upon quotes.
    pub min_transaction_span: TimeDelta,
}

#[derive(Debug, Clone)]
pub struct StrategyEngine {
    params: StrategyParams,
    position: Position,
}

impl StrategyEngine {
    /// New engine with a fresh position; opening cash equals the total buy
    /// limit.
    pub fn new(params: StrategyParams) -> Self {
        let cash = allocate_percent(&params.target_value, params.total_buy_limit_perc);
        let position = Position::new(&params.currency, cash);
        StrategyEngine { params, position }
    }

    /// Resume over previously accumulated state.
    pub fn with_position(params: StrategyParams, position: Position) -> Self {
        StrategyEngine { params, position }
    }

    pub fn params(&self) -> &StrategyParams {
        &self.params
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    // Derived limits are computed fresh from the parameters on every call.

    pub fn min_profit(&self) -> Money {
        allocate_percent(&self.params.target_value, self.params.min_profit_perc)
    }

    pub fn min_sell_value(&self) -> Result<Money, DcaError> {
        self.params.target_value.add(&self.min_profit())
    }

    pub fn total_buy_limit(&self) -> Money {
        allocate_percent(&self.params.target_value, self.params.total_buy_limit_perc)
    }

    /// The budget ROI is measured against; identical to the total buy limit.
    pub fn budget(&self) -> Money {
        self.total_buy_limit()
    }

    pub fn single_buy_limit(&self) -> Money {
        allocate_percent(&self.params.target_value, self.params.single_buy_limit_perc)
    }

    pub fn single_sell_limit(&self) -> Money {
        allocate_percent(&self.params.target_value, self.params.single_sell_limit_perc)
    }

    pub fn asset_value(&self, price: &Money) -> Money {
        Money::from_major(
            price.as_major_units() * self.position.asset_amount,
            &self.params.currency,
        )
    }

    pub fn total_value(&self, price: &Money) -> Result<Money, DcaError> {
        self.asset_value(price).add(&self.position.cash)
    }

    /// Return on investment against the budget, i.e. the total buy limit
    /// rather than cash actually invested (headroom-based accounting,
    /// preserved from the original strategy).
    pub fn roi(&self, price: &Money) -> Result<Money, DcaError> {
        self.total_value(price)?.subtract(&self.budget())
    }

    /// ROI as a unitless ratio of the budget.
    pub fn roi_perc(&self, price: &Money) -> Result<f64, DcaError> {
        Ok(self.roi(price)?.as_major_units() / self.budget().as_major_units())
    }

    /// Decide on one quote. `Ok(None)` is the frequent no-action outcome from
    /// the pacing, equilibrium and minimum-profit guards, not a failure.
    ///
    /// The pacing guard runs before any value comparison: no transaction is
    /// ever produced inside the cooldown window, and a tied asset value during
    /// cooldown does not reset the clock.
    pub fn process(&mut self, quote: &dyn Quote) -> Result<Option<Transaction>, DcaError> {
        let price = quote.price();
        debug!(
            "process {} at {}: asset value {}, last acted {:?}",
            quote.symbol(),
            price,
            self.asset_value(&price),
            self.position.last_acted_time(),
        );

        if let Some(last) = self.position.last_acted_time() {
            let span = quote.time() - last;
            if span < self.params.min_transaction_span {
                debug!(
                    "no action: span {span} below minimum {}",
                    self.params.min_transaction_span
                );
                return Ok(None);
            }
        }
        if price.is_zero() {
            return Err(DcaError::ZeroQuotePrice {
                symbol: quote.symbol().to_string(),
            });
        }

        let asset_value = self.asset_value(&price);
        let action = match asset_value.try_cmp(&self.params.target_value)? {
            Ordering::Equal => {
                debug!("no action: asset value equals target value");
                None
            }
            Ordering::Less => self.buy(&price, &asset_value)?,
            Ordering::Greater => self.sell(&price, &asset_value)?,
        };

        match action {
            Some(tx) => {
                self.position.apply(tx.clone(), QuoteSnapshot::of(quote))?;
                Ok(Some(tx))
            }
            None => Ok(None),
        }
    }

    fn buy(&self, price: &Money, asset_value: &Money) -> Result<Option<Transaction>, DcaError> {
        let limit = self.total_buy_limit();
        if self.position.bought_value.try_cmp(&limit)? != Ordering::Less {
            warn!(
                "refusing to buy: bought {} has reached total buy limit {}",
                self.position.bought_value, limit
            );
            return Err(DcaError::InsufficientBudget {
                bought: self.position.bought_value.clone(),
                limit,
            });
        }

        let desired = self.params.target_value.subtract(asset_value)?;
        let single = self.single_buy_limit();
        let mut value = if desired.try_cmp(&single)? != Ordering::Greater {
            desired
        } else {
            single
        };

        // Never overshoot the ceiling even when the per-trade limit allows it.
        let grown = asset_value.add(&value)?;
        if grown.try_cmp(&limit)? == Ordering::Greater {
            value = limit.subtract(asset_value)?;
        }

        let amount = value.as_major_units() / price.as_major_units();
        debug!("execute buy: {amount} {} for {value}", self.params.symbol);
        Ok(Some(Transaction {
            amount,
            value,
            fee: Money::zero(&self.params.currency),
            time: Utc::now(),
        }))
    }

    fn sell(&self, price: &Money, asset_value: &Money) -> Result<Option<Transaction>, DcaError> {
        let excess = asset_value.subtract(&self.params.target_value)?;
        if excess.try_cmp(&self.min_profit())? == Ordering::Less {
            debug!(
                "no action: excess {excess} below minimum profit {}",
                self.min_profit()
            );
            return Ok(None);
        }

        let single = self.single_sell_limit();
        let value = if excess.try_cmp(&single)? != Ordering::Greater {
            excess
        } else {
            single
        };

        let amount = value.as_major_units() / price.as_major_units();
        debug!("execute sell: {amount} {} for {value}", self.params.symbol);
        let negated = Money::zero(&self.params.currency).subtract(&value)?;
        Ok(Some(Transaction {
            amount: -amount,
            value: negated,
            fee: Money::zero(&self.params.currency),
            time: Utc::now(),
        }))
    }
}
