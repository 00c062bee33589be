use crate::patch::overwrite;
use aida_aux_db::{AuxDb, ExceptionBlock};
use aida_context::{RunContext, RunError};
use aida_extension::Extension;
use aida_statedb::StateDb;
use aida_types::{TxInfo, PSEUDO_TX};
use std::sync::Arc;

/// Patches live state with recorded exception deltas at precise block/tx
/// scope boundaries (§4.5). Implemented as an [`Extension`] so the executor
/// drives it through the ordinary hook chain.
pub struct ExceptionCorrector {
    aux_db: Arc<dyn AuxDb + Send + Sync>,
    next_block: u64,
    current_exception: Option<ExceptionBlock>,
}

impl ExceptionCorrector {
    pub fn new(aux_db: Arc<dyn AuxDb + Send + Sync>, starting_block: u64) -> Self {
        Self { aux_db, next_block: starting_block, current_exception: None }
    }
}

impl<S: StateDb> Extension<S> for ExceptionCorrector {
    fn pre_block(&mut self, block: u64, ctx: &mut RunContext<S>) -> Result<(), RunError> {
        for scanned in self.next_block..block {
            let Some(exception) = self.aux_db.exception(scanned) else { continue };
            let Some(pre_block_patch) = exception.pre_block.as_ref() else { continue };
            ctx.state
                .begin_transaction(PSEUDO_TX)
                .map_err(|e| RunError::Resource(e.to_string()))?;
            overwrite(&mut ctx.state, pre_block_patch);
            ctx.state.end_transaction().map_err(|e| RunError::Resource(e.to_string()))?;
        }

        self.current_exception = self.aux_db.exception(block);
        self.next_block = block + 1;
        Ok(())
    }

    fn pre_transaction(&mut self, tx: &TxInfo, ctx: &mut RunContext<S>) -> Result<(), RunError> {
        let Some(exception) = self.current_exception.as_ref() else { return Ok(()) };
        let Some(tx_exception) = exception.transactions.get(&tx.tx) else { return Ok(()) };
        let Some(pre_tx_patch) = tx_exception.pre_tx.as_ref() else { return Ok(()) };

        let wrote_storage = overwrite(&mut ctx.state, pre_tx_patch);
        if wrote_storage {
            ctx.state.end_transaction().map_err(|e| RunError::Resource(e.to_string()))?;
            ctx.state
                .begin_transaction(tx.tx)
                .map_err(|e| RunError::Resource(e.to_string()))?;
        }
        Ok(())
    }

    fn post_block(&mut self, block: u64, ctx: &mut RunContext<S>) -> Result<(), RunError> {
        if let Some(post_block_patch) = self.current_exception.as_ref().and_then(|e| e.post_block.as_ref()) {
            ctx.state
                .begin_transaction(PSEUDO_TX)
                .map_err(|e| RunError::Resource(e.to_string()))?;
            overwrite(&mut ctx.state, post_block_patch);
            ctx.state.end_transaction().map_err(|e| RunError::Resource(e.to_string()))?;
            tracing::debug!(block, "applied post-block exception patch");
        }
        self.current_exception = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aida_aux_db::{InMemoryAuxDb, TxException};
    use aida_context::ErrorSink;
    use aida_memdb::MemStateDb;
    use aida_types::{Account, WorldState};
    use alloy::primitives::{U256, address};
    use std::path::PathBuf;

    fn context(aux_db: Arc<dyn AuxDb + Send + Sync>) -> RunContext<MemStateDb> {
        RunContext::new(
            MemStateDb::new(),
            aux_db,
            PathBuf::from("/tmp/aida-test"),
            Arc::new(ErrorSink::new(8, 1000)),
        )
    }

    #[test]
    fn pre_block_applies_patch_for_intervening_exception_block() {
        let addr = address!("0000000000000000000000000000000000000001");
        let mut aux_db = InMemoryAuxDb::new();
        let mut exception = ExceptionBlock::default();
        let mut patch = WorldState::new();
        patch.insert(addr, Account::new(0, U256::from(77), vec![]));
        exception.pre_block = Some(patch);
        aux_db.put_exception(5, exception);
        let aux_db: Arc<dyn AuxDb + Send + Sync> = Arc::new(aux_db);

        let mut corrector = ExceptionCorrector::new(aux_db.clone(), 0);
        let mut ctx = context(aux_db);
        <ExceptionCorrector as Extension<MemStateDb>>::pre_block(&mut corrector, 6, &mut ctx).unwrap();

        assert_eq!(ctx.state.get_balance(addr), U256::from(77));
    }

    #[test]
    fn pre_transaction_applies_tx_level_patch_without_new_scope() {
        let addr = address!("0000000000000000000000000000000000000002");
        let mut aux_db = InMemoryAuxDb::new();
        let mut exception = ExceptionBlock::default();
        let mut patch = WorldState::new();
        patch.insert(addr, Account::new(0, U256::from(5), vec![]));
        exception.transactions.insert(1, TxException { pre_tx: Some(patch), post_tx: None });
        aux_db.put_exception(10, exception);
        let aux_db: Arc<dyn AuxDb + Send + Sync> = Arc::new(aux_db);

        let mut corrector = ExceptionCorrector::new(aux_db.clone(), 10);
        let mut ctx = context(aux_db);
        <ExceptionCorrector as Extension<MemStateDb>>::pre_block(&mut corrector, 10, &mut ctx).unwrap();
        ctx.state.begin_transaction(1).unwrap();
        <ExceptionCorrector as Extension<MemStateDb>>::pre_transaction(
            &mut corrector,
            &TxInfo {
                block: 10,
                tx: 1,
                data: aida_types::TxContext {
                    input_state: WorldState::new(),
                    output_state: WorldState::new(),
                    block_environment: aida_types::BlockEnvironment {
                        coinbase: alloy::primitives::Address::ZERO,
                        difficulty: Default::default(),
                        gas_limit: 30_000_000,
                        number: 10,
                        timestamp: 0,
                        base_fee: None,
                        blob_base_fee: None,
                        random: None,
                        recent_block_hashes: Default::default(),
                        fork: "shanghai".into(),
                    },
                    message: aida_types::Message {
                        sender: alloy::primitives::Address::ZERO,
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
                        skip_nonce_checks: true,
                    },
                    result: aida_types::ExecutionResult::empty_success(),
                },
            },
            &mut ctx,
        )
        .unwrap();

        assert_eq!(ctx.state.get_balance(addr), U256::from(5));
    }
}
