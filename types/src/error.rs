//! Top-level error type for value parsing and conversion.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid support value: {0}")]
    InvalidSupport(u8),

    #[error("unknown clock mode: {0}")]
    UnknownClockMode(String),
}
