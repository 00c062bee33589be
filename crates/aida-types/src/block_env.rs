use alloy::primitives::{Address, B256, U256};
use std::collections::BTreeMap;

/// Block-level environment a transaction executed against.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlockEnvironment {
    pub coinbase: Address,
    pub difficulty: U256,
    pub gas_limit: u64,
    pub number: u64,
    pub timestamp: u64,
    pub base_fee: Option<U256>,
    pub blob_base_fee: Option<U256>,
    /// post-Merge `prevrandao`, when applicable.
    pub random: Option<B256>,
    /// Recent block numbers mapped to their hash (EIP-2935-style lookback window).
    pub recent_block_hashes: BTreeMap<u64, B256>,
    /// Fork identifier string (e.g. `"london"`, `"cancun"`, `"prague"`).
    pub fork: String,
}

impl BlockEnvironment {
    pub fn block_hash(&self, number: u64) -> Option<B256> {
        self.recent_block_hashes.get(&number).copied()
    }
}
