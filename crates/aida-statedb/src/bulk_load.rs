use crate::error::StateDbError;
use alloy::primitives::{Address, B256, U256};

/// Write-only, transactionless fast path used by the primer (§4.6). Writes
/// are only visible to readers after `close`.
pub trait BulkLoad {
    fn create_account(&mut self, address: Address);
    fn set_balance(&mut self, address: Address, balance: U256);
    fn set_nonce(&mut self, address: Address, nonce: u64);
    fn set_code(&mut self, address: Address, code: Vec<u8>);
    fn set_state(&mut self, address: Address, key: B256, value: B256);
    fn close(self) -> Result<(), StateDbError>;
}
