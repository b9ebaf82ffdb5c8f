//! Port traits consumed and produced by the domain.

pub mod config_port;
pub mod report_port;
pub mod stream_port;
