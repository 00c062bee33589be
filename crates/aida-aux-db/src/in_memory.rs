use crate::exception::ExceptionBlock;
use crate::traits::{AuxDb, Substate};
use crate::update_set::UpdateSet;
use alloy::primitives::{Address, B256};
use std::collections::BTreeMap;

/// In-memory reference [`AuxDb`], keyed the way a column-family-backed
/// implementation would be keyed but without any on-disk representation.
/// Intended for tests and for priming small synthetic fixtures.
#[derive(Debug, Default)]
pub struct InMemoryAuxDb {
    state_roots: BTreeMap<u64, B256>,
    exceptions: BTreeMap<u64, ExceptionBlock>,
    destroyed: BTreeMap<u64, Vec<Address>>,
    resurrected: BTreeMap<u64, Vec<Address>>,
    update_sets: BTreeMap<u64, UpdateSet>,
    substates: BTreeMap<(u64, u32), Substate>,
}

impl InMemoryAuxDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_state_root(&mut self, block: u64, root: B256) {
        self.state_roots.insert(block, root);
    }

    pub fn put_exception(&mut self, block: u64, exception: ExceptionBlock) {
        if !exception.is_empty() {
            self.exceptions.insert(block, exception);
        }
    }

    pub fn put_destroyed(&mut self, block: u64, accounts: Vec<Address>) {
        self.destroyed.insert(block, accounts);
    }

    pub fn put_resurrected(&mut self, block: u64, accounts: Vec<Address>) {
        self.resurrected.insert(block, accounts);
    }

    pub fn put_update_set(&mut self, update_set: UpdateSet) {
        self.update_sets.insert(update_set.block, update_set);
    }

    pub fn put_substate(&mut self, substate: Substate) {
        self.substates.insert((substate.block, substate.tx), substate);
    }
}

impl AuxDb for InMemoryAuxDb {
    fn state_root(&self, block: u64) -> Option<B256> {
        self.state_roots.get(&block).copied()
    }

    fn exception(&self, block: u64) -> Option<ExceptionBlock> {
        self.exceptions.get(&block).cloned()
    }

    fn destroyed_accounts_in_range(&self, from_block: u64, to_block: u64) -> Vec<Address> {
        self.destroyed
            .range(from_block..=to_block)
            .flat_map(|(_, addrs)| addrs.iter().copied())
            .collect()
    }

    fn resurrected_accounts_in_range(&self, from_block: u64, to_block: u64) -> Vec<Address> {
        self.resurrected
            .range(from_block..=to_block)
            .flat_map(|(_, addrs)| addrs.iter().copied())
            .collect()
    }

    fn update_sets(&self, from_block: u64, to_block: u64) -> Vec<UpdateSet> {
        self.update_sets
            .range(from_block..to_block)
            .map(|(_, u)| u.clone())
            .collect()
    }

    fn substates(&self, from_block: u64, to_block: u64) -> Vec<Substate> {
        self.substates
            .range((from_block, u32::MIN)..(to_block, u32::MIN))
            .map(|(_, s)| s.clone())
            .collect()
    }
}
