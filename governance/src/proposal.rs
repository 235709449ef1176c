//! Proposals, their lifecycle, and the per-voter vote records.

use crate::error::GovernanceError;
use ballot_crypto::{encode, keccak256, Token};
use ballot_types::{Action, Address, ProposalId, Support, Timepoint};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Marker that restricts a description to a single proposer.
const PROPOSER_SUFFIX: &str = "#proposer=0x";

/// Where a proposal is in its lifecycle.
///
/// Only `Executed` is stored; every other state is derived from the clock and
/// the tally each time it is asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    /// The snapshot has not passed yet; no votes accepted.
    Pending,
    /// Between snapshot and deadline; votes accepted.
    Active,
    /// Deadline passed without quorum or without a majority for.
    Defeated,
    /// Deadline passed with quorum and a majority for; executable.
    Succeeded,
    Executed,
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Defeated => "defeated",
            Self::Succeeded => "succeeded",
            Self::Executed => "executed",
        };
        f.write_str(name)
    }
}

/// A stored proposal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: Address,
    pub actions: Vec<Action>,
    pub description: String,
    /// Voting power is measured here; voting opens right after it.
    pub snapshot: Timepoint,
    /// Last timepoint at which votes are accepted.
    pub deadline: Timepoint,
    pub executed: bool,
}

impl Proposal {
    /// Resolve the lifecycle state at `now`.
    ///
    /// `outcome` reports whether the proposal reached quorum and passed; it is
    /// only consulted once the deadline is behind us.
    pub fn state_at(&self, now: Timepoint, outcome: impl FnOnce() -> bool) -> ProposalState {
        if self.executed {
            ProposalState::Executed
        } else if self.snapshot >= now {
            ProposalState::Pending
        } else if self.deadline >= now {
            ProposalState::Active
        } else if outcome() {
            ProposalState::Succeeded
        } else {
            ProposalState::Defeated
        }
    }
}

/// What a voter cast on a proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub support: Support,
    /// Weight that went into the tally (after any parameter adjustment).
    pub weight: u128,
    pub reason: String,
    pub params: Vec<u8>,
}

/// The deterministic identity of a proposal.
///
/// `keccak256(abi.encode(address[] targets, uint256[] values, bytes[] calldatas, bytes32 descriptionHash))`
pub fn hash_proposal(actions: &[Action], description: &str) -> ProposalId {
    let targets = actions.iter().map(|a| Token::Address(a.target)).collect();
    let values = actions.iter().map(|a| Token::uint(a.value)).collect();
    let calldatas = actions
        .iter()
        .map(|a| Token::Bytes(a.calldata.clone()))
        .collect();
    let encoded = encode(&[
        Token::Array(targets),
        Token::Array(values),
        Token::Array(calldatas),
        Token::FixedBytes(keccak256(description.as_bytes())),
    ]);
    ProposalId::new(keccak256(&encoded))
}

/// The proposer a description is restricted to, if it ends with
/// `#proposer=0x<40 hex digits>`. Anything else is unrestricted.
pub fn restricted_proposer(description: &str) -> Option<Address> {
    let start = description.rfind(PROPOSER_SUFFIX)? + PROPOSER_SUFFIX.len();
    let digits = &description[start..];
    if digits.len() != 2 * Address::LEN || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    digits.parse().ok()
}

/// Append-only store of proposals and the votes cast on them.
#[derive(Default)]
pub struct ProposalStore {
    proposals: HashMap<ProposalId, Proposal>,
    /// Creation order, for listing.
    order: Vec<ProposalId>,
    votes: HashMap<(ProposalId, Address), VoteRecord>,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new proposal. Identities are never reused.
    pub fn insert(&mut self, proposal: Proposal) -> Result<(), GovernanceError> {
        if self.proposals.contains_key(&proposal.id) {
            return Err(GovernanceError::DuplicateProposal(proposal.id));
        }
        self.order.push(proposal.id);
        self.proposals.insert(proposal.id, proposal);
        Ok(())
    }

    pub fn get(&self, id: &ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposals
            .get(id)
            .ok_or(GovernanceError::ProposalNotFound(*id))
    }

    pub fn contains(&self, id: &ProposalId) -> bool {
        self.proposals.contains_key(id)
    }

    /// Flag a proposal as executed. Fails if it already was.
    pub fn mark_executed(&mut self, id: &ProposalId) -> Result<(), GovernanceError> {
        let proposal = self
            .proposals
            .get_mut(id)
            .ok_or(GovernanceError::ProposalNotFound(*id))?;
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted(*id));
        }
        proposal.executed = true;
        Ok(())
    }

    /// Record a vote. At most one record per (proposal, voter).
    pub fn record_vote(
        &mut self,
        id: &ProposalId,
        voter: &Address,
        record: VoteRecord,
    ) -> Result<(), GovernanceError> {
        if !self.proposals.contains_key(id) {
            return Err(GovernanceError::ProposalNotFound(*id));
        }
        let key = (*id, *voter);
        if self.votes.contains_key(&key) {
            return Err(GovernanceError::AlreadyVoted {
                id: *id,
                voter: *voter,
            });
        }
        self.votes.insert(key, record);
        Ok(())
    }

    pub fn has_voted(&self, id: &ProposalId, voter: &Address) -> bool {
        self.votes.contains_key(&(*id, *voter))
    }

    pub fn vote_of(&self, id: &ProposalId, voter: &Address) -> Option<&VoteRecord> {
        self.votes.get(&(*id, *voter))
    }

    /// Proposal identities in creation order.
    pub fn ids(&self) -> &[ProposalId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
