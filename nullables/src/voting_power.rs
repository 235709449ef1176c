//! Nullable voting power: checkpointed weights held in memory.

use ballot_governance::VotingPowerSource;
use ballot_types::{Address, Timepoint};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

type Checkpoints = HashMap<Address, BTreeMap<Timepoint, u128>>;

/// An in-memory checkpointed token.
///
/// `set_weight(account, from, weight)` records that `account` holds `weight`
/// from timepoint `from` onwards. Lookups return the latest checkpoint at or
/// before the requested timepoint. Total supply is the sum over all accounts.
#[derive(Clone, Debug, Default)]
pub struct NullVotingPower {
    checkpoints: Arc<Mutex<Checkpoints>>,
}

impl NullVotingPower {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed accounts with a weight held since genesis.
    pub fn with_weights(weights: impl IntoIterator<Item = (Address, u128)>) -> Self {
        let power = Self::new();
        for (account, weight) in weights {
            power.set_weight(account, Timepoint::GENESIS, weight);
        }
        power
    }

    pub fn set_weight(&self, account: Address, from: Timepoint, weight: u128) {
        self.checkpoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(account)
            .or_default()
            .insert(from, weight);
    }

    fn lookup(checkpoints: &BTreeMap<Timepoint, u128>, timepoint: Timepoint) -> u128 {
        checkpoints
            .range(..=timepoint)
            .next_back()
            .map(|(_, weight)| *weight)
            .unwrap_or(0)
    }
}

impl VotingPowerSource for NullVotingPower {
    fn weight_of(&self, account: &Address, timepoint: Timepoint) -> u128 {
        let checkpoints = self
            .checkpoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        checkpoints
            .get(account)
            .map(|history| Self::lookup(history, timepoint))
            .unwrap_or(0)
    }

    fn total_supply_at(&self, timepoint: Timepoint) -> u128 {
        let checkpoints = self
            .checkpoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        checkpoints
            .values()
            .map(|history| Self::lookup(history, timepoint))
            .fold(0u128, u128::saturating_add)
    }
}
