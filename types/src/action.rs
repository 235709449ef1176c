//! A single call that a proposal performs when executed.

use crate::address::Address;
use serde::{Deserialize, Serialize};

/// One step of a proposal: call `target` with `calldata`, transferring `value`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub target: Address,
    pub value: u128,
    pub calldata: Vec<u8>,
}

impl Action {
    pub fn new(target: Address, value: u128, calldata: impl Into<Vec<u8>>) -> Self {
        Self {
            target,
            value,
            calldata: calldata.into(),
        }
    }
}
