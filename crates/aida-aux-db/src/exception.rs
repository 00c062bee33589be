use aida_types::WorldState;
use std::collections::BTreeMap;

/// A transaction-level patch slot within an [`ExceptionBlock`].
#[derive(Debug, Clone, Default)]
pub struct TxException {
    pub pre_tx: Option<WorldState>,
    pub post_tx: Option<WorldState>,
}

/// A block whose recorded post-state diverges from deterministic replay; the
/// corrector (§4.5) and the updater (Design Notes, known-exception blocks)
/// consult this to patch the live state at precise scope boundaries.
#[derive(Debug, Clone, Default)]
pub struct ExceptionBlock {
    pub pre_block: Option<WorldState>,
    pub post_block: Option<WorldState>,
    pub transactions: BTreeMap<u32, TxException>,
}

impl ExceptionBlock {
    pub fn is_empty(&self) -> bool {
        self.pre_block.is_none() && self.post_block.is_none() && self.transactions.is_empty()
    }
}
