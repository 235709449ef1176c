//! Governance voting core.
//!
//! Proposals move through Pending → Active → Succeeded/Defeated → Executed
//! as timepoints pass. Votes are cast directly or through EIP-712 signed
//! ballots guarded by per-voter nonces, weighted by an external voting power
//! source, and tallied by a pluggable counting strategy.
//!
//! The [`GovernorCore`] owns all mutable state and reaches the outside world
//! only through the [`Clock`], [`VotingPowerSource`] and [`ActionExecutor`]
//! traits.

pub mod ballot;
pub mod clock;
pub mod config;
pub mod counting;
pub mod error;
pub mod events;
pub mod executor;
pub mod governor;
pub mod nonces;
pub mod proposal;
pub mod signature;
pub mod voting_power;

pub use ballot::{Ballot, BallotEncoding, CompactBallot, ExtendedBallot};
pub use clock::{Clock, SystemClock};
pub use config::GovernorConfig;
pub use counting::{
    CountedVote, CountingStrategy, DecodedParams, ParamsCounter, SimpleCounter, Tally, VoteCounter,
};
pub use error::GovernanceError;
pub use events::{EventBus, GovernanceEvent, Listener};
pub use executor::{ActionExecutor, ActionFailure};
pub use governor::{Authorization, GovernorCore};
pub use nonces::NonceLedger;
pub use proposal::{hash_proposal, Proposal, ProposalState, ProposalStore, VoteRecord};
pub use signature::SignatureVerifier;
pub use voting_power::VotingPowerSource;
