use crate::tx_context::TxContext;

/// Sentinel transaction index denoting a synthetic per-block transaction
/// (miner rewards, withdrawals, parent-hash recording). Never snapshotted,
/// never receipt-validated.
pub const PSEUDO_TX: u32 = 99_999;

/// One record in the persisted transaction stream. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TxInfo {
    pub block: u64,
    pub tx: u32,
    pub data: TxContext,
}

impl TxInfo {
    pub fn is_pseudo(&self) -> bool {
        self.tx == PSEUDO_TX
    }
}

/// Derives a deterministic pseudo tx-hash from `(block, tx)` the way
/// implementations commonly pack both into the lower bytes of a hash, per
/// §4.2. Used by the processor for `SetTxContext` and by the archive
/// inquirer to identify replayed transactions.
pub fn derive_tx_hash(block: u64, tx: u32) -> alloy::primitives::B256 {
    let mut bytes = [0u8; 32];
    bytes[16..24].copy_from_slice(&block.to_be_bytes());
    bytes[28..32].copy_from_slice(&tx.to_be_bytes());
    alloy::primitives::B256::from(bytes)
}

/// Derives a deterministic block-hash placeholder from the block number,
/// used wherever the engine needs *a* stable hash for a block it has not
/// independently computed a root for (e.g. log filters in tests).
pub fn derive_block_hash(block: u64) -> alloy::primitives::B256 {
    let mut bytes = [0u8; 32];
    bytes[24..32].copy_from_slice(&block.to_be_bytes());
    alloy::primitives::B256::from(bytes)
}
