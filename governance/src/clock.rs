//! Where "now" comes from.

use ballot_types::{ClockMode, Timepoint};
use std::time::{SystemTime, UNIX_EPOCH};

/// The governor's view of the current timepoint.
pub trait Clock: Send {
    fn now(&self) -> Timepoint;

    fn mode(&self) -> ClockMode;
}

/// Wall-clock time in Unix seconds.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timepoint {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Timepoint::new(secs)
    }

    fn mode(&self) -> ClockMode {
        ClockMode::Timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_timestamp_mode() {
        let clock = SystemClock;
        assert_eq!(clock.mode(), ClockMode::Timestamp);
        assert!(clock.now() > Timepoint::new(1_600_000_000));
    }
}
