//! Binance klines JSON file stream adapter.
//!
//! Replays a saved Binance klines API response (an array of 12-element
//! arrays) as an ordered quote stream.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use serde_json::Value;

use crate::domain::error::DcaError;
use crate::domain::kline::Kline;
use crate::ports::stream_port::{QuoteHandler, StreamPort};

pub struct BinanceFileAdapter {
    path: PathBuf,
    symbol: String,
    currency: String,
}

impl BinanceFileAdapter {
    pub fn new(path: PathBuf, symbol: &str, currency: &str) -> Self {
        Self {
            path,
            symbol: symbol.to_string(),
            currency: currency.to_string(),
        }
    }
}

impl StreamPort for BinanceFileAdapter {
    fn stream(&self, handler: &mut QuoteHandler) -> Result<(), DcaError> {
        let file = File::open(&self.path)?;
        let rows: Vec<Vec<Value>> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| DcaError::KlineFormat {
                reason: format!("{}: {e}", self.path.display()),
            })?;

        for row in &rows {
            let kline = Kline::from_binance(&self.symbol, &self.currency, row)?;
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

    const KLINES: &str = r#"[
        [1499040000000, "10.00", "12.00", "9.00", "11.00", "100.0", 1499126399000, "0", 1, "0", "0", "0"],
        [1499126400000, "11.00", "13.00", "10.00", "12.00", "100.0", 1499212799000, "0", 1, "0", "0", "0"]
    ]"#;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn streams_all_klines_in_order() {
        let file = write_temp(KLINES);
        let adapter = BinanceFileAdapter::new(file.path().to_path_buf(), "SOLUSDT", "USD");

        let mut seen = Vec::new();
        adapter
            .stream(&mut |q| {
                seen.push(QuoteSnapshot::of(q));
                Ok(())
            })
            .unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].symbol, "SOLUSDT");
        // (10.00 + 11.00) / 2
        assert_eq!(seen[0].price.minor_units(), 1050);
        assert!(seen[0].time < seen[1].time);
    }

    #[test]
    fn malformed_row_is_a_kline_format_error() {
        let file = write_temp(r#"[[1499040000000, "10.00"]]"#);
        let adapter = BinanceFileAdapter::new(file.path().to_path_buf(), "SOLUSDT", "USD");
        let result = adapter.stream(&mut |_| Ok(()));
        assert!(matches!(result, Err(DcaError::KlineFormat { .. })));
    }

    #[test]
    fn handler_error_halts_the_stream() {
        let file = write_temp(KLINES);
        let adapter = BinanceFileAdapter::new(file.path().to_path_buf(), "SOLUSDT", "USD");

        let mut calls = 0;
        let result = adapter.stream(&mut |_| {
            calls += 1;
            Err(DcaError::Stream {
                reason: "stop".into(),
            })
        });

        assert!(matches!(result, Err(DcaError::Stream { .. })));
        assert_eq!(calls, 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let adapter =
            BinanceFileAdapter::new(PathBuf::from("/nonexistent/klines.json"), "SOLUSDT", "USD");
        assert!(matches!(
            adapter.stream(&mut |_| Ok(())),
            Err(DcaError::Io(_))
        ));
    }
}
