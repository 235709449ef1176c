//! Nullable infrastructure for deterministic testing.
//!
//! Every collaborator the governor depends on (clock, voting power, action
//! execution) has a test implementation here that:
//! - Returns deterministic values
//! - Can be controlled programmatically
//! - Never touches the filesystem or network
//!
//! Each nullable is a cheap `Clone` handle over shared state, so a test can
//! hand one copy to the governor and keep another to drive and inspect it.

pub mod clock;
pub mod executor;
pub mod voting_power;

pub use clock::NullClock;
pub use executor::{AppliedCall, NullExecutor};
pub use voting_power::NullVotingPower;
