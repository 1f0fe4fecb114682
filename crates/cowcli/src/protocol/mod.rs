use alloy_primitives::{Address, Bytes, U256};

pub mod calls;
pub mod consts;
pub mod contracts;
pub mod planner;

/// A pending on-chain step, with a description the confirmation gate shows
/// before it is sent (or bundled).
#[derive(Debug, Clone)]
pub struct OnchainOperation {
    pub description: String,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}
