//! Fixed-point monetary values and exact percentage allocation.
//!
//! A [`Money`] is an integer count of minor units (cents for USD) tagged with
//! an ISO currency code. Arithmetic between mismatched currencies fails;
//! allocation splits a value into proportional parts that always sum back to
//! the original to the minor unit.

use std::cmp::Ordering;
use std::fmt;

use crate::domain::error::DcaError;

/// Minor-unit exponent for a currency code. Defaults to 2.
fn exponent_for(code: &str) -> u32 {
    match code {
        "BIF" | "CLP" | "DJF" | "GNF" | "JPY" | "KMF" | "KRW" | "PYG" | "RWF" | "UGX"
        | "VND" | "VUV" | "XAF" | "XOF" | "XPF" => 0,
        "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => 3,
        _ => 2,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    minor: i64,
    currency: String,
}

impl Money {
    pub fn new(minor: i64, currency: &str) -> Self {
        Money {
            minor,
            currency: currency.to_string(),
        }
    }

    pub fn zero(currency: &str) -> Self {
        Money::new(0, currency)
    }

    /// Build from a major-unit amount, truncating any sub-minor-unit residue.
    pub fn from_major(major: f64, currency: &str) -> Self {
        let scale = 10i64.pow(exponent_for(currency)) as f64;
        Money::new((major * scale) as i64, currency)
    }

    pub fn minor_units(&self) -> i64 {
        self.minor
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn as_major_units(&self) -> f64 {
        let scale = 10i64.pow(exponent_for(&self.currency)) as f64;
        self.minor as f64 / scale
    }

    pub fn is_zero(&self) -> bool {
        self.minor == 0
    }

    pub fn is_negative(&self) -> bool {
        self.minor < 0
    }

    pub fn is_positive(&self) -> bool {
        self.minor > 0
    }

    fn same_currency(&self, other: &Money) -> Result<(), DcaError> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(DcaError::CurrencyMismatch {
                left: self.currency.clone(),
                right: other.currency.clone(),
            })
        }
    }

    pub fn add(&self, other: &Money) -> Result<Money, DcaError> {
        self.same_currency(other)?;
        Ok(Money::new(self.minor + other.minor, &self.currency))
    }

    pub fn subtract(&self, other: &Money) -> Result<Money, DcaError> {
        self.same_currency(other)?;
        Ok(Money::new(self.minor - other.minor, &self.currency))
    }

    /// Checked three-way comparison; fails on currency mismatch.
    pub fn try_cmp(&self, other: &Money) -> Result<Ordering, DcaError> {
        self.same_currency(other)?;
        Ok(self.minor.cmp(&other.minor))
    }

    /// Split into one part per ratio, proportionally. The parts sum to the
    /// original exactly; any truncation remainder goes to the first part.
    /// Negative ratios are allowed as long as the ratios do not sum to zero.
    pub fn allocate(&self, ratios: &[i64]) -> Result<Vec<Money>, DcaError> {
        if ratios.is_empty() {
            return Err(DcaError::Allocation {
                reason: "no ratios given".to_string(),
            });
        }
        let total: i64 = ratios.iter().sum();
        if total == 0 {
            return Err(DcaError::Allocation {
                reason: "ratios sum to zero".to_string(),
            });
        }

        let mut parts: Vec<Money> = ratios
            .iter()
            .map(|r| Money::new(self.minor * r / total, &self.currency))
            .collect();
        let allocated: i64 = parts.iter().map(|p| p.minor).sum();
        parts[0].minor += self.minor - allocated;
        Ok(parts)
    }
}

/// Return `perc` percent of `total`, exactly.
///
/// `perc` is accepted in two forms: values above 1 are whole percentages
/// (`200` means 200%), values up to 1 are fractions (`0.10` means 10%). The
/// total is split into a `{perc, 100 - perc}` pair whose minor units sum back
/// to the total; the remainder share may be negative when `perc` exceeds 100,
/// which is how buy budgets above the target value are expressed.
pub fn allocate_percent(total: &Money, perc: f64) -> Money {
    let p = if perc > 1.0 {
        perc as i64
    } else {
        (perc * 100.0) as i64
    };
    let share = total.minor * p / 100;
    let rest = total.minor * (100 - p) / 100;
    Money::new(share + (total.minor - share - rest), &total.currency)
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let exp = exponent_for(&self.currency);
        if exp == 0 {
            return write!(f, "{} {}", self.minor, self.currency);
        }
        let scale = 10u64.pow(exp);
        let sign = if self.minor < 0 { "-" } else { "" };
        let abs = self.minor.unsigned_abs();
        write!(
            f,
            "{sign}{major}.{frac:0width$} {cur}",
            major = abs / scale,
            frac = abs % scale,
            width = exp as usize,
            cur = self.currency
        )
    }
}
