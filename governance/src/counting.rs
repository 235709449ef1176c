//! Vote counting strategies.
//!
//! A [`VoteCounter`] turns `(support, weight, params)` into per-proposal
//! [`Tally`] updates and answers the quorum/outcome questions the lifecycle
//! needs once a deadline has passed. The strategy is chosen once, when the
//! governor is built (see [`CountingStrategy`]).

use crate::error::GovernanceError;
use ballot_crypto::{decode, ParamKind};
use ballot_types::{Address, ProposalId, Support};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregate weight per support choice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub against: u128,
    pub for_votes: u128,
    pub abstain: u128,
}

/// Vote parameters decoded by a parameter-aware counter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedParams {
    /// Subtracted from the voter's weight before counting.
    pub adjustment: u128,
    pub note: String,
}

/// The result of counting one vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountedVote {
    /// Weight that actually went into the tally.
    pub weight: u128,
    /// Present when the counter decoded parameters for this vote.
    pub params: Option<DecodedParams>,
}

/// A vote counting strategy.
///
/// The governor guarantees `count_vote` is called at most once per
/// (proposal, voter), so implementations need not deduplicate.
pub trait VoteCounter: Send {
    /// Machine-readable description of how votes are counted.
    fn counting_mode(&self) -> &'static str;

    /// Add a vote to the proposal's tally. Either the whole vote is counted or
    /// nothing changes.
    fn count_vote(
        &mut self,
        proposal_id: &ProposalId,
        voter: &Address,
        support: Support,
        weight: u128,
        params: &[u8],
    ) -> Result<CountedVote, GovernanceError>;

    fn proposal_votes(&self, proposal_id: &ProposalId) -> Tally;

    /// For and abstain weight together meet `quorum`.
    fn quorum_reached(&self, proposal_id: &ProposalId, quorum: u128) -> bool {
        let tally = self.proposal_votes(proposal_id);
        tally.for_votes.saturating_add(tally.abstain) >= quorum
    }

    /// Strictly more weight for than against.
    fn vote_succeeded(&self, proposal_id: &ProposalId) -> bool {
        let tally = self.proposal_votes(proposal_id);
        tally.for_votes > tally.against
    }
}

/// Which counter a governor is built with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingStrategy {
    /// For/against/abstain; params are ignored.
    #[default]
    Simple,
    /// Like `Simple`, but non-empty params decode to a weight reduction.
    WithParams,
}

impl CountingStrategy {
    pub fn build(self) -> Box<dyn VoteCounter> {
        match self {
            Self::Simple => Box::new(SimpleCounter::default()),
            Self::WithParams => Box::new(ParamsCounter::default()),
        }
    }
}

/// Tallies keyed by proposal, with overflow-checked accumulation.
#[derive(Clone, Debug, Default)]
struct TallyBook {
    tallies: HashMap<ProposalId, Tally>,
}

impl TallyBook {
    fn add(
        &mut self,
        proposal_id: &ProposalId,
        support: Support,
        weight: u128,
    ) -> Result<(), GovernanceError> {
        let tally = self.tallies.entry(*proposal_id).or_default();
        let bucket = match support {
            Support::Against => &mut tally.against,
            Support::For => &mut tally.for_votes,
            Support::Abstain => &mut tally.abstain,
        };
        *bucket = bucket
            .checked_add(weight)
            .ok_or(GovernanceError::TallyOverflow(*proposal_id))?;
        Ok(())
    }

    fn get(&self, proposal_id: &ProposalId) -> Tally {
        self.tallies.get(proposal_id).copied().unwrap_or_default()
    }
}

/// Plain for/against/abstain counting.
#[derive(Clone, Debug, Default)]
pub struct SimpleCounter {
    book: TallyBook,
}

impl VoteCounter for SimpleCounter {
    fn counting_mode(&self) -> &'static str {
        "support=bravo&quorum=for,abstain"
    }

    fn count_vote(
        &mut self,
        proposal_id: &ProposalId,
        _voter: &Address,
        support: Support,
        weight: u128,
        _params: &[u8],
    ) -> Result<CountedVote, GovernanceError> {
        self.book.add(proposal_id, support, weight)?;
        Ok(CountedVote {
            weight,
            params: None,
        })
    }

    fn proposal_votes(&self, proposal_id: &ProposalId) -> Tally {
        self.book.get(proposal_id)
    }
}

/// Counting where params, when present, are `abi.encode(uint256 adjustment, string note)`
/// and the adjustment is taken off the voter's weight.
///
/// An adjustment larger than the weight rejects the vote; it is never clamped.
#[derive(Clone, Debug, Default)]
pub struct ParamsCounter {
    book: TallyBook,
}

impl ParamsCounter {
    /// Decode vote params. Empty params mean "no parameters".
    pub fn decode_params(params: &[u8]) -> Result<Option<DecodedParams>, GovernanceError> {
        if params.is_empty() {
            return Ok(None);
        }
        let tokens = decode(&[ParamKind::Uint, ParamKind::String], params)
            .map_err(|e| GovernanceError::InvalidParams(e.to_string()))?;
        let adjustment = tokens[0].as_u128().ok_or_else(|| {
            GovernanceError::InvalidParams("adjustment exceeds 128 bits".to_string())
        })?;
        let note = tokens[1].as_str().unwrap_or_default().to_string();
        Ok(Some(DecodedParams { adjustment, note }))
    }
}

impl VoteCounter for ParamsCounter {
    fn counting_mode(&self) -> &'static str {
        "support=bravo&quorum=for,abstain&params=reduction"
    }

    fn count_vote(
        &mut self,
        proposal_id: &ProposalId,
        _voter: &Address,
        support: Support,
        weight: u128,
        params: &[u8],
    ) -> Result<CountedVote, GovernanceError> {
        let decoded = Self::decode_params(params)?;
        let counted = match &decoded {
            Some(p) => weight.checked_sub(p.adjustment).ok_or_else(|| {
                GovernanceError::InvalidParams(format!(
                    "adjustment {} exceeds voting weight {}",
                    p.adjustment, weight
                ))
            })?,
            None => weight,
        };
        self.book.add(proposal_id, support, counted)?;
        Ok(CountedVote {
            weight: counted,
            params: decoded,
        })
    }

    fn proposal_votes(&self, proposal_id: &ProposalId) -> Tally {
        self.book.get(proposal_id)
    }
}
