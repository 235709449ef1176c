//! The side-effecting half of proposal execution.

use ballot_types::Action;
use thiserror::Error;

/// Why a single action failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct ActionFailure {
    pub reason: String,
}

impl ActionFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Performs proposal actions inside a batch that is applied all-or-nothing.
///
/// The governor calls `begin`, then `call` for each action in order, then
/// either `commit` (all succeeded) or `rollback` (one failed). Effects of calls
/// in a rolled-back batch must not be observable afterwards.
pub trait ActionExecutor: Send {
    fn begin(&mut self);

    /// Perform one action, returning its output data.
    fn call(&mut self, action: &Action) -> Result<Vec<u8>, ActionFailure>;

    fn commit(&mut self);

    fn rollback(&mut self);
}
