//! Configuration validation.
//!
//! Validates the `[strategy]` and `[data]` sections before a run starts.

use crate::domain::error::DcaError;
use crate::ports::config_port::ConfigPort;

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), DcaError> {
    validate_symbol(config)?;
    validate_target_value(config)?;
    validate_percentage(config, "single_buy_limit_perc")?;
    validate_percentage(config, "single_sell_limit_perc")?;
    validate_percentage(config, "total_buy_limit_perc")?;
    validate_percentage(config, "min_profit_perc")?;
    validate_transaction_span(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "binance".to_string());
    if source != "binance" && source != "csv" {
        return Err(DcaError::ConfigInvalid {
            section: "data".to_string(),
            key: "source".to_string(),
            reason: format!("unknown source {source:?}, expected binance or csv"),
        });
    }
    if config.get_string("data", "path").is_none() {
        return Err(DcaError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        });
    }
    Ok(())
}

fn validate_symbol(config: &dyn ConfigPort) -> Result<(), DcaError> {
    match config.get_string("strategy", "symbol") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(DcaError::ConfigMissing {
            section: "strategy".to_string(),
            key: "symbol".to_string(),
        }),
    }
}

fn validate_target_value(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let value = config.get_double("strategy", "target_value", 0.0);
    if value <= 0.0 {
        return Err(DcaError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "target_value".to_string(),
            reason: "target_value must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_percentage(config: &dyn ConfigPort, key: &str) -> Result<(), DcaError> {
    let value = config.get_double("strategy", key, 0.0);
    if value < 0.0 {
        return Err(DcaError::ConfigInvalid {
            section: "strategy".to_string(),
            key: key.to_string(),
            reason: format!("{key} must be non-negative"),
        });
    }
    Ok(())
}

fn validate_transaction_span(config: &dyn ConfigPort) -> Result<(), DcaError> {
    let hours = config.get_int("strategy", "min_transaction_span_hours", 0);
    if hours < 0 {
        return Err(DcaError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "min_transaction_span_hours".to_string(),
            reason: "min_transaction_span_hours must be non-negative".to_string(),
        });
    }
    Ok(())
}
