/// Selects between `Finalise` and `IntermediateRoot` at end-of-transaction,
/// matching Design Notes §9: pre-Byzantium Ethereum requires
/// `IntermediateRoot(delete_empty_objects)`, later chains/forks require
/// `Finalise(true)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainConduit {
    pub chain_id: u64,
    pub byzantium_block: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndOfTxAction {
    IntermediateRoot { delete_empty_objects: bool },
    Finalise { delete_empty_objects: bool },
}

impl ChainConduit {
    pub const ETHEREUM_MAINNET: u64 = 1;

    pub fn new(chain_id: u64, byzantium_block: u64) -> Self {
        Self { chain_id, byzantium_block }
    }

    /// Ethereum mainnet before Byzantium activation uses `IntermediateRoot`;
    /// everything else (post-Byzantium Ethereum, and all other chains, which
    /// are assumed Byzantium-equivalent from genesis) uses `Finalise`.
    pub fn end_of_tx_action(&self, block: u64) -> EndOfTxAction {
        if self.chain_id == Self::ETHEREUM_MAINNET && block < self.byzantium_block {
            EndOfTxAction::IntermediateRoot { delete_empty_objects: false }
        } else {
            EndOfTxAction::Finalise { delete_empty_objects: true }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_byzantium_mainnet_uses_intermediate_root() {
        let conduit = ChainConduit::new(1, 4_370_000);
        assert_eq!(
            conduit.end_of_tx_action(1_000_000),
            EndOfTxAction::IntermediateRoot { delete_empty_objects: false }
        );
    }

    #[test]
    fn post_byzantium_mainnet_uses_finalise() {
        let conduit = ChainConduit::new(1, 4_370_000);
        assert_eq!(
            conduit.end_of_tx_action(5_000_000),
            EndOfTxAction::Finalise { delete_empty_objects: true }
        );
    }

    #[test]
    fn other_chains_always_finalise() {
        let conduit = ChainConduit::new(250, 0);
        assert_eq!(conduit.end_of_tx_action(1), EndOfTxAction::Finalise { delete_empty_objects: true });
    }
}
