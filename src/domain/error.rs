//! Domain error types.

use crate::domain::money::Money;

/// Top-level error type for dcabot.
///
/// Guard outcomes inside the engine (pacing, equilibrium, minimum profit) are
/// never errors; they surface as an absent transaction.
#[derive(Debug, thiserror::Error)]
pub enum DcaError {
    #[error("insufficient budget: bought {bought} has reached total buy limit {limit}")]
    InsufficientBudget { bought: Money, limit: Money },

    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: String, right: String },

    #[error("quote for {symbol} has zero price")]
    ZeroQuotePrice { symbol: String },

    #[error("allocation error: {reason}")]
    Allocation { reason: String },

    #[error("quote stream error: {reason}")]
    Stream { reason: String },

    #[error("malformed kline data: {reason}")]
    KlineFormat { reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&DcaError> for std::process::ExitCode {
    fn from(err: &DcaError) -> Self {
        let code: u8 = match err {
            DcaError::Io(_) | DcaError::Report { .. } => 1,
            DcaError::ConfigParse { .. }
            | DcaError::ConfigMissing { .. }
            | DcaError::ConfigInvalid { .. } => 2,
            DcaError::Stream { .. } | DcaError::KlineFormat { .. } => 3,
            DcaError::InsufficientBudget { .. } => 4,
            DcaError::CurrencyMismatch { .. }
            | DcaError::Allocation { .. }
            | DcaError::ZeroQuotePrice { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
