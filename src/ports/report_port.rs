//! Action report port trait.

use serde::Serialize;

use crate::domain::error::DcaError;

/// One row per accepted action: the transaction plus the position and
/// valuation it produced. Reporting is layered on top of the engine's
/// output; the engine itself never sees this type.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRow {
    pub date: String,
    pub price: f64,
    pub transaction_amount: f64,
    pub transaction_value: f64,
    pub asset_amount: f64,
    pub asset_value: f64,
    pub cash: f64,
    pub total_value: f64,
    pub roi: f64,
    pub roi_perc: f64,
    pub num_buys: u32,
    pub amount_bought: f64,
    pub value_bought: f64,
    pub num_sells: u32,
    pub amount_sold: f64,
    pub value_sold: f64,
}

/// Port for writing per-action report rows.
pub trait ReportPort {
    fn write_action(&mut self, row: &ActionRow) -> Result<(), DcaError>;
}
