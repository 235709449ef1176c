//! Nullable clock: deterministic time for testing.

use ballot_governance::Clock;
use ballot_types::{ClockMode, Timepoint};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to.
#[derive(Clone, Debug)]
pub struct NullClock {
    current: Arc<AtomicU64>,
    mode: ClockMode,
}

impl NullClock {
    /// A block-number clock starting at `initial`.
    pub fn new(initial: u64) -> Self {
        Self::with_mode(initial, ClockMode::BlockNumber)
    }

    pub fn with_mode(initial: u64, mode: ClockMode) -> Self {
        Self {
            current: Arc::new(AtomicU64::new(initial)),
            mode,
        }
    }

    /// Advance time by `delta` timepoints.
    pub fn advance(&self, delta: u64) {
        self.current.fetch_add(delta, Ordering::SeqCst);
    }

    /// Set the time to a specific value.
    pub fn set(&self, value: u64) {
        self.current.store(value, Ordering::SeqCst);
    }

    /// Move to the first timepoint after `timepoint`.
    pub fn advance_past(&self, timepoint: Timepoint) {
        self.set(timepoint.as_u64() + 1);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timepoint {
        Timepoint::new(self.current.load(Ordering::SeqCst))
    }

    fn mode(&self) -> ClockMode {
        self.mode
    }
}
