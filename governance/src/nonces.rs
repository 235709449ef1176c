//! Per-voter replay counters for signed ballots.
//!
//! Every voter starts at nonce 0. A signed ballot is always built with the
//! voter's current nonce, and the nonce advances by exactly one once that
//! ballot has been counted, regardless of which proposal it was for.

use crate::error::GovernanceError;
use ballot_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Monotonic nonce per voter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceLedger {
    nonces: HashMap<Address, u64>,
}

impl NonceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from known nonces (e.g. restored from elsewhere, or seeded in tests).
    pub fn with_nonces(nonces: impl IntoIterator<Item = (Address, u64)>) -> Self {
        Self {
            nonces: nonces.into_iter().collect(),
        }
    }

    /// The nonce the next signed ballot from `voter` must be built with.
    pub fn current(&self, voter: &Address) -> u64 {
        self.nonces.get(voter).copied().unwrap_or(0)
    }

    /// The current nonce if it can still be consumed. A voter at `u64::MAX`
    /// has no nonce left to sign with.
    pub fn usable(&self, voter: &Address) -> Option<u64> {
        let nonce = self.current(voter);
        (nonce < u64::MAX).then_some(nonce)
    }

    /// Advance `voter`'s nonce if it still equals `expected`.
    ///
    /// Returns `false` and changes nothing when the nonce has moved on or is
    /// exhausted.
    pub fn consume(&mut self, voter: &Address, expected: u64) -> bool {
        if self.current(voter) != expected {
            return false;
        }
        let Some(next) = expected.checked_add(1) else {
            return false;
        };
        self.nonces.insert(*voter, next);
        debug!(voter = %voter, nonce = next, "nonce consumed");
        true
    }

    /// Number of voters that have a non-default nonce.
    pub fn len(&self) -> usize {
        self.nonces.values().filter(|n| **n > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize the ledger for persistence.
    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(self).map_err(|e| GovernanceError::Serialization(e.to_string()))
    }

    /// Restore a ledger from bytes produced by [`NonceLedger::save_state`].
    pub fn load_state(data: &[u8]) -> Result<Self, GovernanceError> {
        bincode::deserialize(data).map_err(|e| GovernanceError::Serialization(e.to_string()))
    }
}
