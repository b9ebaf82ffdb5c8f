//! CSV action report adapter.

use std::io::Write;

use crate::domain::error::DcaError;
use crate::ports::report_port::{ActionRow, ReportPort};

/// Serializes one CSV row per accepted action; the header row is emitted
/// automatically with the first action.
pub struct CsvReportAdapter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvReportAdapter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, DcaError> {
        self.writer.into_inner().map_err(|e| DcaError::Report {
            reason: e.to_string(),
        })
    }
}

impl<W: Write> ReportPort for CsvReportAdapter<W> {
    fn write_action(&mut self, row: &ActionRow) -> Result<(), DcaError> {
        self.writer.serialize(row).map_err(|e| DcaError::Report {
            reason: e.to_string(),
        })?;
        // Rows interleave with live logging, so flush per action.
        Ok(self.writer.flush()?)
    }
}
