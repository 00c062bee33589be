use alloy::primitives::{Address, B256, Bytes};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// The recorded execution result of one historical transaction. Used for
/// post-validation, never consumed by the processor for `PseudoTx` entries.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExecutionResult {
    pub status: bool,
    pub bloom: Bytes,
    pub logs: Vec<Log>,
    pub contract_address: Option<Address>,
    pub gas_used: u64,
}

impl ExecutionResult {
    pub fn empty_success() -> Self {
        Self { status: true, bloom: Bytes::new(), logs: vec![], contract_address: None, gas_used: 0 }
    }
}
