//! Nullable executor: journals actions and applies them on commit.

use ballot_governance::{ActionExecutor, ActionFailure};
use ballot_types::{Action, Address};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// An action that was committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedCall {
    pub target: Address,
    pub value: u128,
    pub calldata: Vec<u8>,
}

#[derive(Debug, Default)]
struct Ledger {
    pending: Vec<AppliedCall>,
    applied: Vec<AppliedCall>,
    balances: HashMap<Address, u128>,
    failing: HashSet<Address>,
    begun: usize,
    rolled_back: usize,
}

/// A test executor that records calls instead of performing them.
///
/// Calls made between `begin` and `commit` sit in a pending journal and only
/// become visible through [`NullExecutor::applied`] and
/// [`NullExecutor::balance_of`] once committed. Targets registered with
/// [`NullExecutor::fail_target`] make `call` fail.
#[derive(Clone, Debug, Default)]
pub struct NullExecutor {
    ledger: Arc<Mutex<Ledger>>,
}

impl NullExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every future call to `target` fail.
    pub fn fail_target(&self, target: Address) {
        self.ledger().failing.insert(target);
    }

    /// Let calls to `target` succeed again.
    pub fn heal_target(&self, target: &Address) {
        self.ledger().failing.remove(target);
    }

    /// Committed calls, in order.
    pub fn applied(&self) -> Vec<AppliedCall> {
        self.ledger().applied.clone()
    }

    /// Total committed value sent to `target`.
    pub fn balance_of(&self, target: &Address) -> u128 {
        self.ledger().balances.get(target).copied().unwrap_or(0)
    }

    /// Number of batches started.
    pub fn batches(&self) -> usize {
        self.ledger().begun
    }

    pub fn rollbacks(&self) -> usize {
        self.ledger().rolled_back
    }
}

impl ActionExecutor for NullExecutor {
    fn begin(&mut self) {
        let mut ledger = self.ledger();
        ledger.pending.clear();
        ledger.begun += 1;
    }

    fn call(&mut self, action: &Action) -> Result<Vec<u8>, ActionFailure> {
        let mut ledger = self.ledger();
        if ledger.failing.contains(&action.target) {
            return Err(ActionFailure::new(format!(
                "call to {} reverted",
                action.target
            )));
        }
        trace!(target_address = %action.target, value = action.value, "call journaled");
        ledger.pending.push(AppliedCall {
            target: action.target,
            value: action.value,
            calldata: action.calldata.clone(),
        });
        Ok(action.calldata.clone())
    }

    fn commit(&mut self) {
        let mut ledger = self.ledger();
        let pending = std::mem::take(&mut ledger.pending);
        for call in pending {
            let balance = ledger.balances.entry(call.target).or_insert(0);
            *balance = balance.saturating_add(call.value);
            ledger.applied.push(call);
        }
    }

    fn rollback(&mut self) {
        let mut ledger = self.ledger();
        ledger.pending.clear();
        ledger.rolled_back += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(n: u8) -> Address {
        Address::new([n; 20])
    }

    #[test]
    fn committed_calls_are_applied() {
        let mut executor = NullExecutor::new();
        let handle = executor.clone();
        executor.begin();
        let out = executor
            .call(&Action::new(target(1), 5, vec![0xab]))
            .unwrap();
        assert_eq!(out, vec![0xab]);
        assert!(handle.applied().is_empty());
        executor.commit();
        assert_eq!(handle.applied().len(), 1);
        assert_eq!(handle.balance_of(&target(1)), 5);
    }

    #[test]
    fn rollback_discards_pending_calls() {
        let mut executor = NullExecutor::new();
        executor.fail_target(target(2));
        executor.begin();
        executor.call(&Action::new(target(1), 5, vec![])).unwrap();
        assert!(executor.call(&Action::new(target(2), 1, vec![])).is_err());
        executor.rollback();
        assert!(executor.applied().is_empty());
        assert_eq!(executor.balance_of(&target(1)), 0);
        assert_eq!(executor.rollbacks(), 1);
    }

    #[test]
    fn healed_target_succeeds() {
        let mut executor = NullExecutor::new();
        executor.fail_target(target(2));
        executor.heal_target(&target(2));
        executor.begin();
        assert!(executor.call(&Action::new(target(2), 1, vec![])).is_ok());
    }
}
