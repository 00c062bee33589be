use aida_types::WorldState;
use alloy::primitives::Address;

/// A pre-merged world-state delta covering a range of blocks, used to
/// accelerate priming (§4.6 phase one).
#[derive(Debug, Clone)]
pub struct UpdateSet {
    pub block: u64,
    pub state: WorldState,
    pub deleted_accounts: Vec<Address>,
}

impl UpdateSet {
    /// Rough in-memory size estimate used by the primer to decide when to
    /// flush its accumulation buffer.
    pub fn approx_size_bytes(&self) -> usize {
        self.state
            .iter()
            .map(|(_, acc)| 20 + 32 + 8 + acc.code.len() + acc.storage.len() * 64)
            .sum::<usize>()
            + self.deleted_accounts.len() * 20
    }
}
