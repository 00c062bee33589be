use crate::account::Account;
use alloy::primitives::Address;
use std::collections::BTreeMap;

/// A full world state: every touched address and its account entry.
///
/// Backed by a `BTreeMap` so iteration order is always ascending by address —
/// required by spec for root-stable priming and reproducible validation
/// diffs.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WorldState(BTreeMap<Address, Account>);

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.0.contains_key(address)
    }

    pub fn get(&self, address: &Address) -> Option<&Account> {
        self.0.get(address)
    }

    pub fn get_mut(&mut self, address: &Address) -> Option<&mut Account> {
        self.0.get_mut(address)
    }

    pub fn entry_or_default(&mut self, address: Address) -> &mut Account {
        self.0.entry(address).or_default()
    }

    pub fn insert(&mut self, address: Address, account: Account) {
        self.0.insert(address, account);
    }

    pub fn remove(&mut self, address: &Address) -> Option<Account> {
        self.0.remove(address)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deterministic, address-ascending iteration.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Account)> {
        self.0.iter()
    }

    /// Merges `other` on top of `self`, as update-set accumulation does
    /// during priming (§4.6 phase one/two).
    pub fn merge_from(&mut self, other: &WorldState) {
        for (addr, acc) in other.iter() {
            self.0.insert(*addr, acc.clone());
        }
    }

    /// Drops the storage (but keeps nonce/balance/code) of `addresses`, as
    /// the primer does for accounts listed in `DeletedAccounts`.
    pub fn clear_storage_of(&mut self, addresses: &[Address]) {
        for addr in addresses {
            if let Some(acc) = self.0.get_mut(addr) {
                acc.storage.clear();
            }
        }
    }
}

impl FromIterator<(Address, Account)> for WorldState {
    fn from_iter<T: IntoIterator<Item = (Address, Account)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{U256, address};

    #[test]
    fn iteration_is_address_sorted() {
        let mut ws = WorldState::new();
        ws.insert(address!("0000000000000000000000000000000000000002"), Account::default());
        ws.insert(address!("0000000000000000000000000000000000000001"), Account::default());
        let addrs: Vec<_> = ws.iter().map(|(a, _)| *a).collect();
        assert_eq!(
            addrs,
            vec![
                address!("0000000000000000000000000000000000000001"),
                address!("0000000000000000000000000000000000000002"),
            ]
        );
    }

    #[test]
    fn merge_overwrites_existing_entries() {
        let mut base = WorldState::new();
        let addr = address!("0000000000000000000000000000000000000001");
        base.insert(addr, Account::new(1, U256::from(10), vec![]));

        let mut update = WorldState::new();
        update.insert(addr, Account::new(2, U256::from(20), vec![]));

        base.merge_from(&update);
        assert_eq!(base.get(&addr).unwrap().nonce, 2);
    }
}
