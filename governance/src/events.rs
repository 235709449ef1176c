//! Events emitted by the governor for external indexers.

use crate::counting::DecodedParams;
use ballot_types::{Action, Address, ProposalId, Support, Timepoint};
use serde::{Deserialize, Serialize};

/// Governance events, in the order the governor emits them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    ProposalCreated {
        id: ProposalId,
        proposer: Address,
        actions: Vec<Action>,
        description: String,
        snapshot: Timepoint,
        deadline: Timepoint,
    },
    /// A vote without params.
    VoteCast {
        voter: Address,
        id: ProposalId,
        support: Support,
        weight: u128,
        reason: String,
    },
    /// A vote that carried params; `weight` is the counted weight.
    VoteCastWithParams {
        voter: Address,
        id: ProposalId,
        support: Support,
        weight: u128,
        reason: String,
        params: Vec<u8>,
    },
    /// A counter decoded params; emitted before the vote event it belongs to.
    CountParams(DecodedParams),
    ProposalExecuted {
        id: ProposalId,
    },
}

/// A subscriber callback.
pub type Listener = Box<dyn Fn(&GovernanceEvent) + Send + Sync>;

/// Synchronous fan-out event bus.
///
/// Listeners are invoked inline on the emitting call; keep handlers fast.
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &GovernanceEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
