//! The external source of voting weight.

use ballot_types::{Address, Timepoint};

/// Historical voting weight, typically a checkpointed token.
///
/// Lookups must be deterministic for a fixed `(account, timepoint)`: the
/// governor only ever asks about timepoints that are already in the past.
pub trait VotingPowerSource: Send {
    fn weight_of(&self, account: &Address, timepoint: Timepoint) -> u128;

    /// Total weight in existence at `timepoint`; the base for quorum.
    fn total_supply_at(&self, timepoint: Timepoint) -> u128;
}
