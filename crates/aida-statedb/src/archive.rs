use crate::error::StateDbError;
use alloy::primitives::{Address, B256, U256};

/// A read-only, non-committable projection of the state as of a past block.
/// Carries the same read surface as `StateDb` plus `release`; any write is a
/// protocol violation (§6).
pub trait ArchiveView {
    fn begin_transaction(&mut self, tx: u32) -> Result<(), StateDbError>;
    fn end_transaction(&mut self) -> Result<(), StateDbError>;

    fn exist(&self, address: Address) -> bool;
    fn get_balance(&self, address: Address) -> U256;
    fn get_nonce(&self, address: Address) -> u64;
    fn get_code(&self, address: Address) -> Vec<u8>;
    fn get_state(&self, address: Address, key: B256) -> B256;
    fn get_storage_root(&self, address: Address) -> B256;

    fn snapshot(&mut self) -> usize;
    fn revert_to_snapshot(&mut self, id: usize);

    fn get_hash(&self) -> Result<B256, StateDbError>;

    /// Releases the view. The engine must call this before the enclosing
    /// `PostBlock` returns (invariant I3); subsequent use is a bug, not a
    /// recoverable error, and implementations may panic if it happens.
    fn release(self);
}
