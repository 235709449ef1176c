//! The governor: proposal creation, voting and execution over injected
//! collaborators.
//!
//! Every public mutating call either completes fully or returns an error and
//! leaves proposals, tallies, vote records and nonces untouched. Calls take
//! `&mut self`, so a single governor is driven by one writer at a time.

use crate::ballot::{Ballot, BallotEncoding};
use crate::clock::Clock;
use crate::config::{GovernorConfig, QUORUM_DENOMINATOR};
use crate::counting::{Tally, VoteCounter};
use crate::error::GovernanceError;
use crate::events::{EventBus, GovernanceEvent, Listener};
use crate::executor::ActionExecutor;
use crate::nonces::NonceLedger;
use crate::proposal::{
    hash_proposal, restricted_proposer, Proposal, ProposalState, ProposalStore, VoteRecord,
};
use crate::signature::SignatureVerifier;
use crate::voting_power::VotingPowerSource;
use ballot_types::{Action, Address, ProposalId, Timepoint};
use tracing::{debug, info, warn};

/// How the submitter of a ballot proves they may vote as `ballot.voter`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Authorization {
    /// The caller is voting for itself.
    Direct { caller: Address },
    /// A 65-byte signature over the compact `Ballot` message.
    Ballot { signature: Vec<u8> },
    /// A 65-byte signature over the `ExtendedBallot` message.
    ExtendedBallot { signature: Vec<u8> },
}

pub struct GovernorCore {
    config: GovernorConfig,
    verifier: SignatureVerifier,
    nonces: NonceLedger,
    store: ProposalStore,
    counter: Box<dyn VoteCounter>,
    power: Box<dyn VotingPowerSource>,
    executor: Box<dyn ActionExecutor>,
    clock: Box<dyn Clock>,
    events: EventBus,
}

impl GovernorCore {
    /// Build a governor whose counter is chosen by `config.counting`.
    pub fn new(
        config: GovernorConfig,
        clock: Box<dyn Clock>,
        power: Box<dyn VotingPowerSource>,
        executor: Box<dyn ActionExecutor>,
        nonces: NonceLedger,
    ) -> Result<Self, GovernanceError> {
        let counter = config.counting.build();
        Self::with_counter(config, counter, clock, power, executor, nonces)
    }

    /// Build a governor around a caller-supplied counting strategy.
    pub fn with_counter(
        config: GovernorConfig,
        counter: Box<dyn VoteCounter>,
        clock: Box<dyn Clock>,
        power: Box<dyn VotingPowerSource>,
        executor: Box<dyn ActionExecutor>,
        nonces: NonceLedger,
    ) -> Result<Self, GovernanceError> {
        config.validate()?;
        let verifier = SignatureVerifier::new(config.domain());
        info!(
            name = %config.name,
            chain_id = config.chain_id,
            counting = counter.counting_mode(),
            "governor initialised"
        );
        Ok(Self {
            config,
            verifier,
            nonces,
            store: ProposalStore::new(),
            counter,
            power,
            executor,
            clock,
            events: EventBus::new(),
        })
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.events.subscribe(listener);
    }

    // ── Propose ────────────────────────────────────────────────────────

    /// Create a proposal. Voting opens after `voting_delay` and lasts
    /// `voting_period` timepoints.
    pub fn propose(
        &mut self,
        actions: Vec<Action>,
        description: impl Into<String>,
        proposer: Address,
    ) -> Result<ProposalId, GovernanceError> {
        let description = description.into();

        if let Some(restricted_to) = restricted_proposer(&description) {
            if restricted_to != proposer {
                return Err(GovernanceError::RestrictedProposer {
                    proposer,
                    restricted_to,
                });
            }
        }

        let now = self.clock.now();
        let threshold = u128::from(self.config.proposal_threshold);
        if threshold > 0 {
            let weight = self.power.weight_of(&proposer, now.previous());
            if weight < threshold {
                return Err(GovernanceError::ProposerBelowThreshold {
                    proposer,
                    weight,
                    threshold,
                });
            }
        }

        if actions.is_empty() {
            return Err(GovernanceError::EmptyProposal);
        }

        let id = hash_proposal(&actions, &description);
        if self.store.contains(&id) {
            return Err(GovernanceError::DuplicateProposal(id));
        }

        let snapshot = now.after(self.config.voting_delay);
        let deadline = snapshot.after(self.config.voting_period);
        let proposal = Proposal {
            id,
            proposer,
            actions,
            description,
            snapshot,
            deadline,
            executed: false,
        };
        let event = GovernanceEvent::ProposalCreated {
            id,
            proposer,
            actions: proposal.actions.clone(),
            description: proposal.description.clone(),
            snapshot,
            deadline,
        };
        self.store.insert(proposal)?;

        info!(proposal_id = %id, proposer = %proposer, %snapshot, %deadline, "proposal created");
        self.events.emit(&event);
        Ok(id)
    }

    // ── Vote ───────────────────────────────────────────────────────────

    /// Cast `ballot`, returning the weight that was counted.
    ///
    /// Signed ballots are checked against the voter's current nonce, which is
    /// consumed only once the vote has been counted and recorded.
    pub fn vote(
        &mut self,
        ballot: Ballot,
        authorization: Authorization,
    ) -> Result<u128, GovernanceError> {
        let signed_nonce = self.authorize(&ballot, &authorization)?;

        let proposal = self.store.get(&ballot.proposal_id)?;
        let snapshot = proposal.snapshot;
        let state = self.state(&ballot.proposal_id)?;
        if state != ProposalState::Active {
            return Err(GovernanceError::ProposalNotActive {
                id: ballot.proposal_id,
                state,
            });
        }
        if self.store.has_voted(&ballot.proposal_id, &ballot.voter) {
            return Err(GovernanceError::AlreadyVoted {
                id: ballot.proposal_id,
                voter: ballot.voter,
            });
        }

        let weight = self.power.weight_of(&ballot.voter, snapshot);
        let counted = self.counter.count_vote(
            &ballot.proposal_id,
            &ballot.voter,
            ballot.support,
            weight,
            &ballot.params,
        )?;

        self.store.record_vote(
            &ballot.proposal_id,
            &ballot.voter,
            VoteRecord {
                support: ballot.support,
                weight: counted.weight,
                reason: ballot.reason.clone(),
                params: ballot.params.clone(),
            },
        )?;

        // authorize() checked this nonce is current and below u64::MAX, and
        // nothing has touched the ledger since.
        if let Some(nonce) = signed_nonce {
            if !self.nonces.consume(&ballot.voter, nonce) {
                warn!(voter = %ballot.voter, nonce, "nonce could not be consumed");
                return Err(GovernanceError::InvalidSigner {
                    recovered: Address::ZERO,
                    claimed: ballot.voter,
                });
            }
        }

        info!(
            proposal_id = %ballot.proposal_id,
            voter = %ballot.voter,
            support = %ballot.support,
            weight = counted.weight,
            "vote cast"
        );

        if let Some(params) = counted.params {
            self.events.emit(&GovernanceEvent::CountParams(params));
        }
        let event = if ballot.params.is_empty() {
            GovernanceEvent::VoteCast {
                voter: ballot.voter,
                id: ballot.proposal_id,
                support: ballot.support,
                weight: counted.weight,
                reason: ballot.reason,
            }
        } else {
            GovernanceEvent::VoteCastWithParams {
                voter: ballot.voter,
                id: ballot.proposal_id,
                support: ballot.support,
                weight: counted.weight,
                reason: ballot.reason,
                params: ballot.params,
            }
        };
        self.events.emit(&event);

        Ok(counted.weight)
    }

    /// Vote as `caller` without a signature.
    pub fn cast_vote(&mut self, caller: Address, ballot: Ballot) -> Result<u128, GovernanceError> {
        self.vote(ballot, Authorization::Direct { caller })
    }

    /// Vote on behalf of `ballot.voter` with an `ExtendedBallot` signature.
    pub fn cast_vote_by_sig(
        &mut self,
        ballot: Ballot,
        signature: impl Into<Vec<u8>>,
    ) -> Result<u128, GovernanceError> {
        self.vote(
            ballot,
            Authorization::ExtendedBallot {
                signature: signature.into(),
            },
        )
    }

    /// Check the submitter may vote as `ballot.voter`. Returns the nonce the
    /// signature was verified against, if any.
    fn authorize(
        &self,
        ballot: &Ballot,
        authorization: &Authorization,
    ) -> Result<Option<u64>, GovernanceError> {
        match authorization {
            Authorization::Direct { caller } => {
                if *caller != ballot.voter {
                    return Err(GovernanceError::UnauthorizedCaller {
                        caller: *caller,
                        voter: ballot.voter,
                    });
                }
                Ok(None)
            }
            Authorization::Ballot { signature } => {
                if !ballot.reason.is_empty() || !ballot.params.is_empty() {
                    return Err(GovernanceError::UnsignedBallotFields);
                }
                let nonce = self.signing_nonce(&ballot.voter)?;
                self.verifier
                    .authenticate(&ballot.compact_message(nonce), signature, &ballot.voter)?;
                Ok(Some(nonce))
            }
            Authorization::ExtendedBallot { signature } => {
                let nonce = self.signing_nonce(&ballot.voter)?;
                self.verifier
                    .authenticate(&ballot.extended_message(nonce), signature, &ballot.voter)?;
                Ok(Some(nonce))
            }
        }
    }

    /// The nonce a signed ballot from `voter` must carry. An exhausted nonce
    /// matches no signature.
    fn signing_nonce(&self, voter: &Address) -> Result<u64, GovernanceError> {
        self.nonces.usable(voter).ok_or_else(|| {
            warn!(voter = %voter, "nonce exhausted");
            GovernanceError::InvalidSigner {
                recovered: Address::ZERO,
                claimed: *voter,
            }
        })
    }

    // ── Execute ────────────────────────────────────────────────────────

    /// Run a succeeded proposal's actions as one batch.
    ///
    /// If any action fails the batch is rolled back and the proposal stays
    /// `Succeeded`, so execution can be retried.
    pub fn execute(&mut self, id: &ProposalId) -> Result<Vec<Vec<u8>>, GovernanceError> {
        match self.state(id)? {
            ProposalState::Succeeded => {}
            ProposalState::Executed => return Err(GovernanceError::AlreadyExecuted(*id)),
            state => return Err(GovernanceError::ProposalNotActive { id: *id, state }),
        }
        let actions = self.store.get(id)?.actions.clone();

        self.executor.begin();
        let mut results = Vec::with_capacity(actions.len());
        for (index, action) in actions.iter().enumerate() {
            match self.executor.call(action) {
                Ok(output) => results.push(output),
                Err(failure) => {
                    self.executor.rollback();
                    warn!(proposal_id = %id, index, reason = %failure, "execution rolled back");
                    return Err(GovernanceError::ExecutionFailed {
                        index,
                        reason: failure.reason,
                    });
                }
            }
        }
        self.executor.commit();
        self.store.mark_executed(id)?;

        info!(proposal_id = %id, actions = actions.len(), "proposal executed");
        self.events.emit(&GovernanceEvent::ProposalExecuted { id: *id });
        Ok(results)
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Resolve the lifecycle state of a proposal at the current timepoint.
    pub fn state(&self, id: &ProposalId) -> Result<ProposalState, GovernanceError> {
        let proposal = self.store.get(id)?;
        let now = self.clock.now();
        let state = proposal.state_at(now, || self.outcome(proposal));
        debug!(proposal_id = %id, %now, %state, "state resolved");
        Ok(state)
    }

    /// Quorum reached and more weight for than against.
    fn outcome(&self, proposal: &Proposal) -> bool {
        let quorum = self.quorum(proposal.snapshot);
        self.counter.quorum_reached(&proposal.id, quorum)
            && self.counter.vote_succeeded(&proposal.id)
    }

    pub fn proposal(&self, id: &ProposalId) -> Result<&Proposal, GovernanceError> {
        self.store.get(id)
    }

    pub fn proposal_snapshot(&self, id: &ProposalId) -> Result<Timepoint, GovernanceError> {
        Ok(self.store.get(id)?.snapshot)
    }

    pub fn proposal_deadline(&self, id: &ProposalId) -> Result<Timepoint, GovernanceError> {
        Ok(self.store.get(id)?.deadline)
    }

    pub fn proposal_proposer(&self, id: &ProposalId) -> Result<Address, GovernanceError> {
        Ok(self.store.get(id)?.proposer)
    }

    /// Proposal identities in creation order.
    pub fn proposal_ids(&self) -> &[ProposalId] {
        self.store.ids()
    }

    /// The identity `propose` would assign to this content.
    pub fn hash_proposal(&self, actions: &[Action], description: &str) -> ProposalId {
        hash_proposal(actions, description)
    }

    pub fn has_voted(&self, id: &ProposalId, voter: &Address) -> bool {
        self.store.has_voted(id, voter)
    }

    pub fn vote_receipt(&self, id: &ProposalId, voter: &Address) -> Option<&VoteRecord> {
        self.store.vote_of(id, voter)
    }

    pub fn proposal_votes(&self, id: &ProposalId) -> Result<Tally, GovernanceError> {
        self.store.get(id)?;
        Ok(self.counter.proposal_votes(id))
    }

    /// Weight required for quorum at `timepoint`.
    pub fn quorum(&self, timepoint: Timepoint) -> u128 {
        let supply = self.power.total_supply_at(timepoint);
        let numerator = u128::from(self.config.quorum_numerator);
        // numerator <= denominator, so neither product overflows.
        supply / QUORUM_DENOMINATOR * numerator
            + supply % QUORUM_DENOMINATOR * numerator / QUORUM_DENOMINATOR
    }

    pub fn get_votes(&self, account: &Address, timepoint: Timepoint) -> u128 {
        self.power.weight_of(account, timepoint)
    }

    /// The nonce the next signed ballot from `voter` must be built with.
    pub fn nonce(&self, voter: &Address) -> u64 {
        self.nonces.current(voter)
    }

    /// The nonce ledger, e.g. for [`NonceLedger::save_state`].
    pub fn nonces(&self) -> &NonceLedger {
        &self.nonces
    }

    pub fn counting_mode(&self) -> &'static str {
        self.counter.counting_mode()
    }

    pub fn clock_mode(&self) -> &'static str {
        self.clock.mode().description()
    }

    pub fn domain_separator(&self) -> [u8; 32] {
        self.verifier.domain_separator()
    }

    /// The digest `ballot.voter` has to sign right now to cast `ballot`.
    pub fn ballot_digest(&self, ballot: &Ballot, encoding: BallotEncoding) -> [u8; 32] {
        let nonce = self.nonces.current(&ballot.voter);
        match encoding {
            BallotEncoding::Compact => self.verifier.digest(&ballot.compact_message(nonce)),
            BallotEncoding::Extended => self.verifier.digest(&ballot.extended_message(nonce)),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn config(&self) -> &GovernorConfig {
        &self.config
    }
}
