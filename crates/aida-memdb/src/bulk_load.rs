use aida_statedb::{BulkLoad, StateDbError};
use alloy::primitives::{Address, B256, U256};
use std::cell::RefCell;
use std::rc::Rc;

use aida_types::WorldState;

/// Bulk-load handle sharing the backing world state with its
/// [`crate::MemStateDb`] via `Rc<RefCell<_>>`, since `BulkLoad::close`
/// consumes `self` with no path back to the originating db.
pub struct MemBulkLoad {
    pub(crate) state: Rc<RefCell<WorldState>>,
}

impl BulkLoad for MemBulkLoad {
    fn create_account(&mut self, address: Address) {
        self.state.borrow_mut().entry_or_default(address);
    }

    fn set_balance(&mut self, address: Address, balance: U256) {
        self.state.borrow_mut().entry_or_default(address).balance = balance;
    }

    fn set_nonce(&mut self, address: Address, nonce: u64) {
        self.state.borrow_mut().entry_or_default(address).nonce = nonce;
    }

    fn set_code(&mut self, address: Address, code: Vec<u8>) {
        self.state.borrow_mut().entry_or_default(address).code = code;
    }

    fn set_state(&mut self, address: Address, key: B256, value: B256) {
        self.state.borrow_mut().entry_or_default(address).set_storage_slot(key, value);
    }

    fn close(self) -> Result<(), StateDbError> {
        Ok(())
    }
}
