//! Concrete adapter implementations for ports.

pub mod binance_file_adapter;
pub mod csv_file_adapter;
pub mod csv_report_adapter;
pub mod file_config_adapter;
