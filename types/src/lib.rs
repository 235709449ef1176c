//! Fundamental types for the ballot governance core.
//!
//! This crate defines the value types shared across every other crate in the workspace:
//! account addresses, proposal identities, support choices, timepoints and actions.

pub mod action;
pub mod address;
pub mod error;
pub mod hash;
pub mod support;
pub mod time;

pub use action::Action;
pub use address::Address;
pub use error::TypesError;
pub use hash::ProposalId;
pub use support::Support;
pub use time::{ClockMode, Timepoint};
