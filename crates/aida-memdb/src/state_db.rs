use crate::archive::MemArchive;
use crate::bulk_load::MemBulkLoad;
use crate::hashing::state_root;
use aida_statedb::{AccessListEntry, BulkLoad, StateDb, StateDbError};
use aida_types::{Log, WorldState};
use alloy::primitives::{Address, B256, U256};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

#[derive(Clone)]
struct Snapshot {
    state: WorldState,
    suicided: HashSet<Address>,
    created_in_tx: HashSet<Address>,
    logs_len: usize,
    refund: u64,
    access_list_addresses: HashSet<Address>,
    access_list_slots: HashSet<(Address, B256)>,
    transient: BTreeMap<(Address, B256), B256>,
}

/// Single-threaded, non-durable [`StateDb`] reference implementation. Every
/// committed block is retained in full so `get_archive_state` can hand back
/// an exact historical view — fine for tests and small fixtures, not for
/// real chain-length replay.
pub struct MemStateDb {
    state: Rc<RefCell<WorldState>>,
    committed: WorldState,
    suicided: HashSet<Address>,
    created_in_tx: HashSet<Address>,
    logs: Vec<Log>,
    refund: u64,
    access_list_addresses: HashSet<Address>,
    access_list_slots: HashSet<(Address, B256)>,
    transient: BTreeMap<(Address, B256), B256>,
    snapshots: Vec<Snapshot>,
    tx_hash: B256,
    tx_index: usize,
    current_block: u64,
    error: Option<StateDbError>,
    archive_heights: BTreeMap<u64, WorldState>,
}

impl MemStateDb {
    /// Number of snapshots currently on the stack. Test-only introspection;
    /// not part of the `StateDb` contract.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(WorldState::new())),
            committed: WorldState::new(),
            suicided: HashSet::new(),
            created_in_tx: HashSet::new(),
            logs: Vec::new(),
            refund: 0,
            access_list_addresses: HashSet::new(),
            access_list_slots: HashSet::new(),
            transient: BTreeMap::new(),
            snapshots: Vec::new(),
            tx_hash: B256::ZERO,
            tx_index: 0,
            current_block: 0,
            error: None,
            archive_heights: BTreeMap::new(),
        }
    }

    fn finalise_into_state(&mut self, delete_empty_objects: bool) {
        let mut state = self.state.borrow_mut();
        for address in self.suicided.drain() {
            state.remove(&address);
        }
        if delete_empty_objects {
            let empties: Vec<Address> =
                state.iter().filter(|(_, account)| account.is_empty()).map(|(a, _)| *a).collect();
            for address in empties {
                state.remove(&address);
            }
        }
        self.created_in_tx.clear();
        self.transient.clear();
    }
}

impl Default for MemStateDb {
    fn default() -> Self {
        Self::new()
    }
}

impl StateDb for MemStateDb {
    type Archive = MemArchive;
    type Loader = MemBulkLoad;

    fn begin_sync_period(&mut self, _period: u64) {}

    fn end_sync_period(&mut self) {}

    fn begin_block(&mut self, block: u64) -> Result<(), StateDbError> {
        self.current_block = block;
        Ok(())
    }

    fn end_block(&mut self) -> Result<(), StateDbError> {
        Ok(())
    }

    fn begin_transaction(&mut self, _tx: u32) -> Result<(), StateDbError> {
        self.committed = self.state.borrow().clone();
        Ok(())
    }

    fn end_transaction(&mut self) -> Result<(), StateDbError> {
        Ok(())
    }

    fn create_account(&mut self, address: Address) {
        self.state.borrow_mut().entry_or_default(address);
    }

    fn create_contract(&mut self, address: Address) {
        self.created_in_tx.insert(address);
        self.state.borrow_mut().entry_or_default(address);
    }

    fn exist(&self, address: Address) -> bool {
        self.state.borrow().contains(&address)
    }

    fn is_empty(&self, address: Address) -> bool {
        self.state.borrow().get(&address).map(|a| a.is_empty()).unwrap_or(true)
    }

    fn self_destruct(&mut self, address: Address) -> U256 {
        let previous = self.state.borrow().get(&address).map(|a| a.balance).unwrap_or_default();
        if let Some(account) = self.state.borrow_mut().get_mut(&address) {
            account.balance = U256::ZERO;
        }
        self.suicided.insert(address);
        previous
    }

    fn self_destruct_6780(&mut self, address: Address) -> (U256, bool) {
        if !self.created_in_tx.contains(&address) {
            let balance = self.state.borrow().get(&address).map(|a| a.balance).unwrap_or_default();
            return (balance, false);
        }
        (self.self_destruct(address), true)
    }

    fn has_self_destructed(&self, address: Address) -> bool {
        self.suicided.contains(&address)
    }

    fn get_balance(&self, address: Address) -> U256 {
        self.state.borrow().get(&address).map(|a| a.balance).unwrap_or_default()
    }

    fn add_balance(&mut self, address: Address, amount: U256) {
        self.state.borrow_mut().entry_or_default(address).balance += amount;
    }

    fn sub_balance(&mut self, address: Address, amount: U256) {
        self.state.borrow_mut().entry_or_default(address).balance -= amount;
    }

    fn get_nonce(&self, address: Address) -> u64 {
        self.state.borrow().get(&address).map(|a| a.nonce).unwrap_or_default()
    }

    fn set_nonce(&mut self, address: Address, nonce: u64) {
        self.state.borrow_mut().entry_or_default(address).nonce = nonce;
    }

    fn get_code(&self, address: Address) -> Vec<u8> {
        self.state.borrow().get(&address).map(|a| a.code.clone()).unwrap_or_default()
    }

    fn set_code(&mut self, address: Address, code: Vec<u8>) {
        self.state.borrow_mut().entry_or_default(address).code = code;
    }

    fn get_code_hash(&self, address: Address) -> B256 {
        self.state
            .borrow()
            .get(&address)
            .map(|a| alloy::primitives::keccak256(&a.code))
            .unwrap_or_default()
    }

    fn get_code_size(&self, address: Address) -> usize {
        self.state.borrow().get(&address).map(|a| a.code.len()).unwrap_or_default()
    }

    fn get_state(&self, address: Address, key: B256) -> B256 {
        self.state
            .borrow()
            .get(&address)
            .and_then(|a| a.storage.get(&key))
            .copied()
            .unwrap_or_default()
    }

    fn set_state(&mut self, address: Address, key: B256, value: B256) {
        self.state.borrow_mut().entry_or_default(address).set_storage_slot(key, value);
    }

    fn get_committed_state(&self, address: Address, key: B256) -> B256 {
        self.committed
            .get(&address)
            .and_then(|a| a.storage.get(&key))
            .copied()
            .unwrap_or_default()
    }

    fn get_storage_root(&self, address: Address) -> B256 {
        self.state
            .borrow()
            .get(&address)
            .map(|a| crate::hashing::storage_root(&a.storage))
            .unwrap_or_default()
    }

    fn get_transient_state(&self, address: Address, key: B256) -> B256 {
        self.transient.get(&(address, key)).copied().unwrap_or_default()
    }

    fn set_transient_state(&mut self, address: Address, key: B256, value: B256) {
        self.transient.insert((address, key), value);
    }

    fn snapshot(&mut self) -> usize {
        self.snapshots.push(Snapshot {
            state: self.state.borrow().clone(),
            suicided: self.suicided.clone(),
            created_in_tx: self.created_in_tx.clone(),
            logs_len: self.logs.len(),
            refund: self.refund,
            access_list_addresses: self.access_list_addresses.clone(),
            access_list_slots: self.access_list_slots.clone(),
            transient: self.transient.clone(),
        });
        self.snapshots.len() - 1
    }

    fn revert_to_snapshot(&mut self, id: usize) {
        let snapshot = self.snapshots[id].clone();
        self.snapshots.truncate(id);
        *self.state.borrow_mut() = snapshot.state;
        self.suicided = snapshot.suicided;
        self.created_in_tx = snapshot.created_in_tx;
        self.logs.truncate(snapshot.logs_len);
        self.refund = snapshot.refund;
        self.access_list_addresses = snapshot.access_list_addresses;
        self.access_list_slots = snapshot.access_list_slots;
        self.transient = snapshot.transient;
    }

    fn finalise(&mut self, delete_empty_objects: bool) {
        self.finalise_into_state(delete_empty_objects);
    }

    fn intermediate_root(&mut self, delete_empty_objects: bool) -> B256 {
        self.finalise_into_state(delete_empty_objects);
        state_root(&self.state.borrow())
    }

    fn commit(&mut self, block: u64, delete_empty_objects: bool) -> Result<B256, StateDbError> {
        self.finalise_into_state(delete_empty_objects);
        let snapshot = self.state.borrow().clone();
        let root = state_root(&snapshot);
        self.archive_heights.insert(block, snapshot);
        self.snapshots.clear();
        Ok(root)
    }

    fn set_tx_context(&mut self, tx_hash: B256, tx_index: usize) {
        self.tx_hash = tx_hash;
        self.tx_index = tx_index;
        self.access_list_addresses.clear();
        self.access_list_slots.clear();
    }

    fn add_refund(&mut self, amount: u64) {
        self.refund += amount;
    }

    fn sub_refund(&mut self, amount: u64) {
        self.refund = self.refund.saturating_sub(amount);
    }

    fn get_refund(&self) -> u64 {
        self.refund
    }

    fn add_address_to_access_list(&mut self, address: Address) {
        self.access_list_addresses.insert(address);
    }

    fn add_slot_to_access_list(&mut self, address: Address, slot: B256) {
        self.access_list_addresses.insert(address);
        self.access_list_slots.insert((address, slot));
    }

    fn address_in_access_list(&self, address: Address) -> bool {
        self.access_list_addresses.contains(&address)
    }

    fn slot_in_access_list(&self, address: Address, slot: B256) -> (bool, bool) {
        (
            self.access_list_addresses.contains(&address),
            self.access_list_slots.contains(&(address, slot)),
        )
    }

    fn prepare(
        &mut self,
        sender: Address,
        coinbase: Address,
        dest: Option<Address>,
        precompiles: &[Address],
        access_list: &[AccessListEntry],
    ) {
        self.access_list_addresses.clear();
        self.access_list_slots.clear();
        self.access_list_addresses.insert(sender);
        self.access_list_addresses.insert(coinbase);
        if let Some(dest) = dest {
            self.access_list_addresses.insert(dest);
        }
        for precompile in precompiles {
            self.access_list_addresses.insert(*precompile);
        }
        for entry in access_list {
            self.access_list_addresses.insert(entry.address);
            for key in &entry.storage_keys {
                self.access_list_slots.insert((entry.address, *key));
            }
        }
    }

    fn add_log(&mut self, log: Log) {
        self.logs.push(log);
    }

    fn get_logs(
        &self,
        _tx_hash: B256,
        _block_number: u64,
        _block_hash: B256,
        _block_timestamp: u64,
    ) -> Vec<Log> {
        self.logs.clone()
    }

    fn get_hash(&mut self) -> Result<B256, StateDbError> {
        Ok(state_root(&self.state.borrow()))
    }

    fn error(&self) -> Option<&StateDbError> {
        self.error.as_ref()
    }

    fn close(&mut self) -> Result<(), StateDbError> {
        Ok(())
    }

    fn get_archive_state(&self, block: u64) -> Result<Self::Archive, StateDbError> {
        self.archive_heights
            .get(&block)
            .cloned()
            .map(|state| MemArchive::new(block, state))
            .ok_or_else(|| StateDbError::ArchiveUnavailable(block, "no committed snapshot".into()))
    }

    fn get_archive_block_height(&self) -> Result<(u64, bool), StateDbError> {
        match self.archive_heights.keys().next_back() {
            Some(height) => Ok((*height, false)),
            None => Ok((0, true)),
        }
    }

    fn start_bulk_load(&mut self, block: u64) -> Self::Loader {
        self.current_block = block;
        MemBulkLoad { state: Rc::clone(&self.state) }
    }

    fn prepare_substate(&mut self, world_state: &WorldState, block: u64) {
        *self.state.borrow_mut() = world_state.clone();
        self.current_block = block;
    }

    fn get_substate_post_alloc(&self) -> WorldState {
        self.state.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn balance_round_trips_through_snapshot_and_revert() {
        let mut db = MemStateDb::new();
        let addr = address!("0000000000000000000000000000000000000001");
        db.add_balance(addr, U256::from(100));
        let snap = db.snapshot();
        db.add_balance(addr, U256::from(50));
        assert_eq!(db.get_balance(addr), U256::from(150));
        db.revert_to_snapshot(snap);
        assert_eq!(db.get_balance(addr), U256::from(100));
    }

    #[test]
    fn self_destruct_zeroes_balance_and_marks_suicided() {
        let mut db = MemStateDb::new();
        let addr = address!("0000000000000000000000000000000000000001");
        db.add_balance(addr, U256::from(10));
        let previous = db.self_destruct(addr);
        assert_eq!(previous, U256::from(10));
        assert_eq!(db.get_balance(addr), U256::ZERO);
        assert!(db.has_self_destructed(addr));
    }

    #[test]
    fn self_destruct_6780_only_destroys_same_tx_contracts() {
        let mut db = MemStateDb::new();
        let addr = address!("0000000000000000000000000000000000000001");
        db.create_account(addr);
        db.add_balance(addr, U256::from(10));
        let (balance, destroyed) = db.self_destruct_6780(addr);
        assert_eq!(balance, U256::from(10));
        assert!(!destroyed);

        db.create_contract(addr);
        let (_, destroyed) = db.self_destruct_6780(addr);
        assert!(destroyed);
    }

    #[test]
    fn commit_produces_queryable_archive_state() {
        let mut db = MemStateDb::new();
        let addr = address!("0000000000000000000000000000000000000001");
        db.add_balance(addr, U256::from(42));
        db.commit(10, true).unwrap();

        let archive = db.get_archive_state(10).unwrap();
        assert_eq!(archive.get_balance(addr), U256::from(42));
        assert!(db.get_archive_state(11).is_err());
    }

    #[test]
    fn finalise_removes_empty_accounts_when_requested() {
        let mut db = MemStateDb::new();
        let addr = address!("0000000000000000000000000000000000000001");
        db.create_account(addr);
        assert!(db.exist(addr));
        db.finalise(true);
        assert!(!db.exist(addr));
    }

    #[test]
    fn bulk_load_writes_are_visible_after_close() {
        let mut db = MemStateDb::new();
        let addr = address!("0000000000000000000000000000000000000001");
        let mut loader = db.start_bulk_load(5);
        loader.set_balance(addr, U256::from(7));
        loader.close().unwrap();
        assert_eq!(db.get_balance(addr), U256::from(7));
    }
}
