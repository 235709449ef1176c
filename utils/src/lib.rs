//! Shared utilities for the ballot governance core.

pub mod logging;

pub use logging::{init_logging, LogFormat, LogFormatError};
