use aida_types::WorldState;
use alloy::primitives::{B256, U256, keccak256};
use std::collections::BTreeMap;

/// Deterministic (but non-MPT) commitment over a storage map, relying on the
/// map's address/key-ascending iteration order for reproducibility.
pub fn storage_root(storage: &BTreeMap<B256, B256>) -> B256 {
    let mut buf = Vec::with_capacity(storage.len() * 64);
    for (key, value) in storage {
        buf.extend_from_slice(key.as_slice());
        buf.extend_from_slice(value.as_slice());
    }
    keccak256(buf)
}

/// Commitment over the full world state, folding every account in
/// address-ascending order. Not a real Merkle-Patricia root — good enough
/// for cross-checking replay determinism in this reference backend.
pub fn state_root(state: &WorldState) -> B256 {
    let mut buf = Vec::new();
    for (address, account) in state.iter() {
        buf.extend_from_slice(address.as_slice());
        buf.extend_from_slice(&account.nonce.to_be_bytes());
        buf.extend_from_slice(&account.balance.to_be_bytes::<32>());
        buf.extend_from_slice(keccak256(&account.code).as_slice());
        buf.extend_from_slice(storage_root(&account.storage).as_slice());
    }
    keccak256(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aida_types::Account;
    use alloy::primitives::address;

    #[test]
    fn state_root_is_order_independent_of_insertion() {
        let a = address!("0000000000000000000000000000000000000001");
        let b = address!("0000000000000000000000000000000000000002");

        let mut first = WorldState::new();
        first.insert(a, Account::new(1, U256::from(1), vec![]));
        first.insert(b, Account::new(2, U256::from(2), vec![]));

        let mut second = WorldState::new();
        second.insert(b, Account::new(2, U256::from(2), vec![]));
        second.insert(a, Account::new(1, U256::from(1), vec![]));

        assert_eq!(state_root(&first), state_root(&second));
    }

    #[test]
    fn differing_state_yields_differing_root() {
        let a = address!("0000000000000000000000000000000000000001");
        let mut first = WorldState::new();
        first.insert(a, Account::new(1, U256::from(1), vec![]));
        let mut second = WorldState::new();
        second.insert(a, Account::new(2, U256::from(1), vec![]));
        assert_ne!(state_root(&first), state_root(&second));
    }
}
