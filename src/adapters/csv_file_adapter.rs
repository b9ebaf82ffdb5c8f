//! CSV kline file stream adapter.
//!
//! Expects a header row of `open_time,open,high,low,close,close_time` with
//! epoch-millisecond times, one bar per line, already in time order.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::error::DcaError;
use crate::domain::kline::Kline;
use crate::domain::money::Money;
use crate::ports::stream_port::{QuoteHandler, StreamPort};

#[derive(Debug, Deserialize)]
struct KlineRecord {
    open_time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    close_time: i64,
}

pub struct CsvFileAdapter {
    path: PathBuf,
    symbol: String,
    currency: String,
}

impl CsvFileAdapter {
    pub fn new(path: PathBuf, symbol: &str, currency: &str) -> Self {
        Self {
            path,
            symbol: symbol.to_string(),
            currency: currency.to_string(),
        }
    }

    fn timestamp(millis: i64) -> Result<DateTime<Utc>, DcaError> {
        DateTime::from_timestamp(millis / 1000, 0).ok_or_else(|| DcaError::KlineFormat {
            reason: format!("timestamp {millis} out of range"),
        })
    }
}

impl StreamPort for CsvFileAdapter {
    fn stream(&self, handler: &mut QuoteHandler) -> Result<(), DcaError> {
        let mut rdr = csv::Reader::from_path(&self.path).map_err(|e| DcaError::Stream {
            reason: format!("failed to open {}: {e}", self.path.display()),
        })?;

        for result in rdr.deserialize() {
            let record: KlineRecord = result.map_err(|e| DcaError::KlineFormat {
                reason: format!("{}: {e}", self.path.display()),
            })?;
            let kline = Kline {
                symbol: self.symbol.clone(),
                open: Money::from_major(record.open, &self.currency),
                high: Money::from_major(record.high, &self.currency),
                low: Money::from_major(record.low, &self.currency),
                close: Money::from_major(record.close, &self.currency),
                open_time: Self::timestamp(record.open_time)?,
                close_time: Self::timestamp(record.close_time)?,
            };
            handler(&kline)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::QuoteSnapshot;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "open_time,open,high,low,close,close_time\n\
        1499040000000,10.0,12.0,9.0,11.0,1499126399000\n\
        1499126400000,11.0,13.0,10.0,12.0,1499212799000\n";

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn streams_bars_from_csv() {
        let file = write_temp(CSV);
        let adapter = CsvFileAdapter::new(file.path().to_path_buf(), "SOL", "USD");

        let mut seen = Vec::new();
        adapter
            .stream(&mut |q| {
                seen.push(QuoteSnapshot::of(q));
                Ok(())
            })
            .unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].price.minor_units(), 1050);
        assert_eq!(seen[1].price.minor_units(), 1150);
    }

    #[test]
    fn bad_field_is_a_kline_format_error() {
        let file = write_temp("open_time,open,high,low,close,close_time\nx,1,1,1,1,2\n");
        let adapter = CsvFileAdapter::new(file.path().to_path_buf(), "SOL", "USD");
        assert!(matches!(
            adapter.stream(&mut |_| Ok(())),
            Err(DcaError::KlineFormat { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_stream_error() {
        let adapter = CsvFileAdapter::new(PathBuf::from("/nonexistent/bars.csv"), "SOL", "USD");
        assert!(matches!(
            adapter.stream(&mut |_| Ok(())),
            Err(DcaError::Stream { .. })
        ));
    }
}
