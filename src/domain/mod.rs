//! Core domain types and logic.

pub mod money;
pub mod quote;
pub mod kline;
pub mod transaction;
pub mod position;
pub mod engine;
pub mod config_validation;
pub mod error;
