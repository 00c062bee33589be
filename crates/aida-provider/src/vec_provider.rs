use crate::error::ProviderError;
use crate::provider::TxProvider;
use aida_types::TxInfo;

/// A `TxProvider` backed by a pre-sorted in-memory `Vec`. Intended for tests
/// and for small fixture replays where the whole transaction stream fits in
/// memory.
pub struct VecTxProvider {
    records: Vec<TxInfo>,
}

impl VecTxProvider {
    pub fn new(mut records: Vec<TxInfo>) -> Self {
        records.sort_by_key(|record| (record.block, record.tx));
        Self { records }
    }
}

impl TxProvider for VecTxProvider {
    fn run(
        &self,
        first: u64,
        last: u64,
        consumer: &mut dyn FnMut(TxInfo) -> Result<(), ProviderError>,
    ) -> Result<(), ProviderError> {
        for record in self.records.iter().filter(|r| r.block >= first && r.block < last) {
            consumer(record.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aida_types::{BlockEnvironment, ExecutionResult, Message, TxContext, WorldState, PSEUDO_TX};
    use alloy::primitives::Address;

    fn record(block: u64, tx: u32) -> TxInfo {
        TxInfo {
            block,
            tx,
            data: TxContext {
                input_state: WorldState::new(),
                output_state: WorldState::new(),
                block_environment: BlockEnvironment {
                    coinbase: Address::ZERO,
                    difficulty: Default::default(),
                    gas_limit: 30_000_000,
                    number: block,
                    timestamp: 0,
                    base_fee: None,
                    blob_base_fee: None,
                    random: None,
                    recent_block_hashes: Default::default(),
                    fork: "shanghai".into(),
                },
                message: Message {
                    sender: Address::ZERO,
                    to: None,
                    nonce: 0,
                    value: Default::default(),
                    gas_limit: 21_000,
                    gas_price: Default::default(),
                    gas_fee_cap: None,
                    gas_tip_cap: None,
                    data: vec![],
                    access_list: vec![],
                    blob_hashes: vec![],
                    blob_gas_fee_cap: None,
                    set_code_authorizations: vec![],
                    skip_nonce_checks: false,
                },
                result: ExecutionResult::empty_success(),
            },
        }
    }

    #[test]
    fn yields_records_in_ascending_block_and_tx_order_within_range() {
        let provider = VecTxProvider::new(vec![
            record(3, 1),
            record(2, 2),
            record(2, 1),
            record(4, PSEUDO_TX),
            record(5, 0),
        ]);
        let mut seen = Vec::new();
        provider.run(2, 5, &mut |info| {
            seen.push((info.block, info.tx));
            Ok(())
        }).unwrap();
        assert_eq!(seen, vec![(2, 1), (2, 2), (3, 1), (4, PSEUDO_TX)]);
    }

    #[test]
    fn stops_early_when_consumer_errors() {
        let provider = VecTxProvider::new(vec![record(2, 1), record(2, 2), record(3, 1)]);
        let mut calls = 0;
        let result = provider.run(2, 4, &mut |_info| {
            calls += 1;
            if calls == 2 {
                return Err(ProviderError::Consumer("stop".into()));
            }
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(calls, 2);
    }
}
