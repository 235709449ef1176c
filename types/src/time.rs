//! Reference points in history.
//!
//! A governor runs either on block numbers or on Unix timestamps; both are
//! plain `u64` counters wrapped in [`Timepoint`]. Which one is in use is
//! described by [`ClockMode`].

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A block number or a Unix timestamp in seconds, depending on the clock mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timepoint(u64);

impl Timepoint {
    pub const GENESIS: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// `self + delta`, saturating at `u64::MAX`.
    pub fn after(&self, delta: u64) -> Self {
        Self(self.0.saturating_add(delta))
    }

    /// The timepoint immediately before this one, saturating at zero.
    pub fn previous(&self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl fmt::Display for Timepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How timepoints are measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockMode {
    #[default]
    BlockNumber,
    Timestamp,
}

impl ClockMode {
    /// The machine-readable clock description (ERC-6372 `CLOCK_MODE`).
    pub fn description(&self) -> &'static str {
        match self {
            Self::BlockNumber => "mode=blocknumber&from=default",
            Self::Timestamp => "mode=timestamp",
        }
    }
}

impl FromStr for ClockMode {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blocknumber" | "block_number" => Ok(Self::BlockNumber),
            "timestamp" => Ok(Self::Timestamp),
            other => Err(TypesError::UnknownClockMode(other.to_string())),
        }
    }
}
