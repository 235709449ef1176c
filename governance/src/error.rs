use crate::proposal::ProposalState;
use ballot_types::{Address, ProposalId};
use thiserror::Error;

/// Every way a governance call can be rejected.
///
/// A rejected call leaves proposals, tallies, vote records and nonces exactly
/// as they were before the call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("proposal {0} already exists")]
    DuplicateProposal(ProposalId),

    #[error("proposal has no actions")]
    EmptyProposal,

    #[error("proposal {id} is {state}, not in the required state")]
    ProposalNotActive { id: ProposalId, state: ProposalState },

    #[error("{voter} has already voted on proposal {id}")]
    AlreadyVoted { id: ProposalId, voter: Address },

    #[error("proposal {0} has already been executed")]
    AlreadyExecuted(ProposalId),

    #[error("invalid signer: recovered {recovered}, expected {claimed}")]
    InvalidSigner { recovered: Address, claimed: Address },

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("invalid vote params: {0}")]
    InvalidParams(String),

    #[error("action {index} failed: {reason}")]
    ExecutionFailed { index: usize, reason: String },

    #[error("proposer {proposer} has {weight} votes, below the threshold of {threshold}")]
    ProposerBelowThreshold {
        proposer: Address,
        weight: u128,
        threshold: u128,
    },

    #[error("description is restricted to proposer {restricted_to}, got {proposer}")]
    RestrictedProposer {
        proposer: Address,
        restricted_to: Address,
    },

    #[error("caller {caller} cannot vote as {voter}")]
    UnauthorizedCaller { caller: Address, voter: Address },

    #[error("compact ballot signatures do not cover a reason or params")]
    UnsignedBallotFields,

    #[error("tally overflow on proposal {0}")]
    TallyOverflow(ProposalId),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl GovernanceError {
    /// Errors that can never succeed on retry for the same identity.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::AlreadyVoted { .. } | Self::AlreadyExecuted(_) | Self::DuplicateProposal(_)
        )
    }
}
