use crate::exception::ExceptionBlock;
use crate::update_set::UpdateSet;
use aida_types::TxInfo;
use alloy::primitives::{Address, B256};

/// A captured `(InputState, Message, OutputState)` triple plus block
/// environment and result — one per historical transaction. Reuses
/// [`TxInfo`] since the shape is identical (see GLOSSARY in spec.md).
pub type Substate = TxInfo;

/// Read-only byte-keyed auxiliary store (`aidaDb` in spec.md). Exposes state
/// roots, exceptions, destroyed-accounts ranges, and update-set/substate
/// iteration over block ranges.
pub trait AuxDb {
    /// The expected live-state root for `block`, read from
    /// `"<stateRootPrefix>" || hex(block)` per §4.7.
    fn state_root(&self, block: u64) -> Option<B256>;

    fn exception(&self, block: u64) -> Option<ExceptionBlock>;

    /// Addresses self-destructed within `[from_block, to_block]`.
    fn destroyed_accounts_in_range(&self, from_block: u64, to_block: u64) -> Vec<Address>;

    /// Resurrected (re-created after being destroyed) addresses within the
    /// same range — needed by the primer's phase-two destroyed-account
    /// bookkeeping.
    fn resurrected_accounts_in_range(&self, from_block: u64, to_block: u64) -> Vec<Address>;

    fn update_sets(&self, from_block: u64, to_block: u64) -> Vec<UpdateSet>;

    fn substates(&self, from_block: u64, to_block: u64) -> Vec<Substate>;

    /// True when `block` has no recorded transactions — the state-hash
    /// validator consults this to tolerate a trailing empty block after a
    /// root mismatch (§4.7, edge case 6).
    fn block_has_no_transactions(&self, block: u64) -> bool {
        self.substates(block, block + 1).is_empty()
    }
}
