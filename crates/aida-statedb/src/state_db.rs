use crate::archive::ArchiveView;
use crate::bulk_load::BulkLoad;
use crate::error::StateDbError;
use aida_types::{Log, WorldState};
use alloy::primitives::{Address, B256, U256};

/// One `(address, storage-key)` access-list entry, as consumed by `prepare`.
#[derive(Debug, Clone)]
pub struct AccessListEntry {
    pub address: Address,
    pub storage_keys: Vec<B256>,
}

/// The capability set a backend must expose to the processor and to
/// extensions (spec.md §6). Implementations differ in durability and in
/// whether sync-period/archive operations are real or no-ops; the contract
/// is purely capability-based (Design Notes §9).
pub trait StateDb {
    type Archive: ArchiveView;
    type Loader: BulkLoad;

    // -- scope --
    fn begin_sync_period(&mut self, period: u64);
    fn end_sync_period(&mut self);
    fn begin_block(&mut self, block: u64) -> Result<(), StateDbError>;
    fn end_block(&mut self) -> Result<(), StateDbError>;
    fn begin_transaction(&mut self, tx: u32) -> Result<(), StateDbError>;
    fn end_transaction(&mut self) -> Result<(), StateDbError>;

    // -- account lifecycle --
    fn create_account(&mut self, address: Address);
    fn create_contract(&mut self, address: Address);
    fn exist(&self, address: Address) -> bool;
    fn is_empty(&self, address: Address) -> bool;
    /// Returns the balance the account held immediately before destruction.
    fn self_destruct(&mut self, address: Address) -> U256;
    /// EIP-6780 variant: only destroys same-transaction-created contracts.
    /// Returns `(previous_balance, destroyed)`.
    fn self_destruct_6780(&mut self, address: Address) -> (U256, bool);
    fn has_self_destructed(&self, address: Address) -> bool;

    // -- balance / nonce / code --
    fn get_balance(&self, address: Address) -> U256;
    fn add_balance(&mut self, address: Address, amount: U256);
    fn sub_balance(&mut self, address: Address, amount: U256);
    fn get_nonce(&self, address: Address) -> u64;
    fn set_nonce(&mut self, address: Address, nonce: u64);
    fn get_code(&self, address: Address) -> Vec<u8>;
    fn set_code(&mut self, address: Address, code: Vec<u8>);
    fn get_code_hash(&self, address: Address) -> B256;
    fn get_code_size(&self, address: Address) -> usize;

    // -- storage --
    fn get_state(&self, address: Address, key: B256) -> B256;
    fn set_state(&mut self, address: Address, key: B256, value: B256);
    fn get_committed_state(&self, address: Address, key: B256) -> B256;
    fn get_storage_root(&self, address: Address) -> B256;
    fn get_transient_state(&self, address: Address, key: B256) -> B256;
    fn set_transient_state(&mut self, address: Address, key: B256, value: B256);

    // -- execution bookkeeping --
    fn snapshot(&mut self) -> usize;
    fn revert_to_snapshot(&mut self, id: usize);
    fn finalise(&mut self, delete_empty_objects: bool);
    fn intermediate_root(&mut self, delete_empty_objects: bool) -> B256;
    fn commit(&mut self, block: u64, delete_empty_objects: bool) -> Result<B256, StateDbError>;
    fn set_tx_context(&mut self, tx_hash: B256, tx_index: usize);

    // -- refund --
    fn add_refund(&mut self, amount: u64);
    fn sub_refund(&mut self, amount: u64);
    fn get_refund(&self) -> u64;

    // -- access list --
    fn add_address_to_access_list(&mut self, address: Address);
    fn add_slot_to_access_list(&mut self, address: Address, slot: B256);
    fn address_in_access_list(&self, address: Address) -> bool;
    fn slot_in_access_list(&self, address: Address, slot: B256) -> (bool, bool);
    #[allow(clippy::too_many_arguments)]
    fn prepare(
        &mut self,
        sender: Address,
        coinbase: Address,
        dest: Option<Address>,
        precompiles: &[Address],
        access_list: &[AccessListEntry],
    );

    // -- logs --
    fn add_log(&mut self, log: Log);
    fn get_logs(&self, tx_hash: B256, block_number: u64, block_hash: B256, block_timestamp: u64) -> Vec<Log>;

    // -- introspection --
    fn get_hash(&mut self) -> Result<B256, StateDbError>;
    fn error(&self) -> Option<&StateDbError>;
    fn close(&mut self) -> Result<(), StateDbError>;

    // -- archive --
    fn get_archive_state(&self, block: u64) -> Result<Self::Archive, StateDbError>;
    /// Returns `(height, is_empty)`.
    fn get_archive_block_height(&self) -> Result<(u64, bool), StateDbError>;

    // -- bulk load --
    fn start_bulk_load(&mut self, block: u64) -> Self::Loader;

    // -- substate staging --
    fn prepare_substate(&mut self, world_state: &WorldState, block: u64);
    fn get_substate_post_alloc(&self) -> WorldState;
}
