//! Ballots: what a voter asks to cast, and the typed messages they sign.

use ballot_crypto::{keccak256, Token, TypedStruct};
use ballot_types::{Address, ProposalId, Support};
use serde::{Deserialize, Serialize};

/// A vote request as submitted to the governor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub proposal_id: ProposalId,
    pub voter: Address,
    pub support: Support,
    pub reason: String,
    /// Opaque to the governor; interpreted by the vote counter.
    pub params: Vec<u8>,
}

impl Ballot {
    pub fn new(proposal_id: ProposalId, voter: Address, support: Support) -> Self {
        Self {
            proposal_id,
            voter,
            support,
            reason: String::new(),
            params: Vec::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_params(mut self, params: impl Into<Vec<u8>>) -> Self {
        self.params = params.into();
        self
    }

    /// The compact typed message for this ballot at `nonce`.
    pub fn compact_message(&self, nonce: u64) -> CompactBallot {
        CompactBallot {
            proposal_id: self.proposal_id,
            support: self.support,
            voter: self.voter,
            nonce,
        }
    }

    /// The extended typed message for this ballot at `nonce`.
    pub fn extended_message(&self, nonce: u64) -> ExtendedBallot {
        ExtendedBallot {
            proposal_id: self.proposal_id,
            support: self.support,
            voter: self.voter,
            nonce,
            reason: self.reason.clone(),
            params: self.params.clone(),
        }
    }
}

/// Which typed message a signature over a [`Ballot`] was made against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BallotEncoding {
    /// [`CompactBallot`]: binds no reason or params.
    Compact,
    #[default]
    Extended,
}

/// `Ballot(uint256 proposalId,uint8 support,address voter,uint256 nonce)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactBallot {
    pub proposal_id: ProposalId,
    pub support: Support,
    pub voter: Address,
    pub nonce: u64,
}

impl TypedStruct for CompactBallot {
    const TYPE: &'static str = "Ballot(uint256 proposalId,uint8 support,address voter,uint256 nonce)";

    fn encode_members(&self) -> Vec<Token> {
        vec![
            Token::proposal_id(&self.proposal_id),
            Token::uint(u128::from(self.support.as_u8())),
            Token::Address(self.voter),
            Token::uint(u128::from(self.nonce)),
        ]
    }
}

/// `ExtendedBallot(uint256 proposalId,uint8 support,address voter,uint256 nonce,string reason,bytes params)`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedBallot {
    pub proposal_id: ProposalId,
    pub support: Support,
    pub voter: Address,
    pub nonce: u64,
    pub reason: String,
    pub params: Vec<u8>,
}

impl TypedStruct for ExtendedBallot {
    const TYPE: &'static str = "ExtendedBallot(uint256 proposalId,uint8 support,address voter,uint256 nonce,string reason,bytes params)";

    fn encode_members(&self) -> Vec<Token> {
        vec![
            Token::proposal_id(&self.proposal_id),
            Token::uint(u128::from(self.support.as_u8())),
            Token::Address(self.voter),
            Token::uint(u128::from(self.nonce)),
            Token::FixedBytes(keccak256(self.reason.as_bytes())),
            Token::FixedBytes(keccak256(&self.params)),
        ]
    }
}
