use crate::hashing::state_root;
use aida_statedb::{ArchiveView, StateDbError};
use aida_types::WorldState;
use alloy::primitives::{Address, B256, U256};

/// A frozen world-state snapshot as of the end of `block`, returned by
/// [`crate::MemStateDb::get_archive_state`]. Archive reads never mutate the
/// frozen state; `snapshot`/`revert_to_snapshot` exist only for interface
/// parity with live scopes and are tracked with a plain counter.
pub struct MemArchive {
    block: u64,
    state: WorldState,
    snapshot_counter: usize,
}

impl MemArchive {
    pub(crate) fn new(block: u64, state: WorldState) -> Self {
        Self { block, state, snapshot_counter: 0 }
    }

    pub fn block(&self) -> u64 {
        self.block
    }
}

impl ArchiveView for MemArchive {
    fn begin_transaction(&mut self, _tx: u32) -> Result<(), StateDbError> {
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<(), StateDbError> {
        Ok(())
    }

    fn exist(&self, address: Address) -> bool {
        self.state.contains(&address)
    }

    fn get_balance(&self, address: Address) -> U256 {
        self.state.get(&address).map(|a| a.balance).unwrap_or_default()
    }

    fn get_nonce(&self, address: Address) -> u64 {
        self.state.get(&address).map(|a| a.nonce).unwrap_or_default()
    }

    fn get_code(&self, address: Address) -> Vec<u8> {
        self.state.get(&address).map(|a| a.code.clone()).unwrap_or_default()
    }

    fn get_state(&self, address: Address, key: B256) -> B256 {
        self.state
            .get(&address)
            .and_then(|a| a.storage.get(&key))
            .copied()
            .unwrap_or_default()
    }

    fn get_storage_root(&self, address: Address) -> B256 {
        self.state
            .get(&address)
            .map(|a| crate::hashing::storage_root(&a.storage))
            .unwrap_or_default()
    }

    fn snapshot(&mut self) -> usize {
        self.snapshot_counter += 1;
        self.snapshot_counter
    }

    fn revert_to_snapshot(&mut self, _id: usize) {}

    fn get_hash(&self) -> Result<B256, StateDbError> {
        Ok(state_root(&self.state))
    }

    fn release(self) {}
}
