use alloy::primitives::{B256, U256};
use std::collections::BTreeMap;

/// One address's world-state entry.
///
/// Storage is keyed by slot hash and sorted by construction (`BTreeMap`), so
/// iteration is deterministic without an explicit sort step — priming and
/// validation both rely on that.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Account {
    pub nonce: u64,
    pub balance: U256,
    pub code: Vec<u8>,
    pub storage: BTreeMap<B256, B256>,
}

impl Account {
    pub fn new(nonce: u64, balance: U256, code: Vec<u8>) -> Self {
        Self { nonce, balance, code, storage: BTreeMap::new() }
    }

    /// Byzantium+ emptiness: no nonce, no balance, no code, no storage.
    pub fn is_empty(&self) -> bool {
        self.nonce == 0 && self.balance.is_zero() && self.code.is_empty() && self.storage.is_empty()
    }

    pub fn set_storage_slot(&mut self, key: B256, value: B256) {
        if value.is_zero() {
            self.storage.remove(&key);
        } else {
            self.storage.insert(key, value);
        }
    }
}
