use crate::error::ProcessorError;
use crate::processor::Processor;
use aida_context::RunContext;
use aida_statedb::StateDb;
use aida_types::{TxInfo, WorldState, derive_tx_hash};

/// Reference processor that replays a transaction by applying its recorded
/// output state directly onto the live view, rather than re-executing
/// bytecode through an EVM. Honors `SkipNonceChecks`, excludes `PseudoTx`
/// from snapshotting and receipt production (§4.2, invariant I4).
#[derive(Debug, Default)]
pub struct SubstateProcessor;

impl<S: StateDb> Processor<S> for SubstateProcessor {
    fn process(&self, tx: &TxInfo, ctx: &mut RunContext<S>) -> Result<(), ProcessorError> {
        let tx_hash = derive_tx_hash(tx.block, tx.tx);
        ctx.state.set_tx_context(tx_hash, tx.tx as usize);

        if !tx.data.message.skip_nonce_checks && !tx.is_pseudo() {
            let expected = tx.data.message.nonce;
            let found = ctx.state.get_nonce(tx.data.message.sender);
            if expected != found {
                return Err(ProcessorError::NonceMismatch { expected, found });
            }
        }

        if tx.is_pseudo() {
            apply_world_state(&mut ctx.state, &tx.data.output_state);
            ctx.execution_result = None;
            return Ok(());
        }

        let _snapshot = ctx.state.snapshot();
        apply_world_state(&mut ctx.state, &tx.data.output_state);
        ctx.execution_result = Some(tx.data.result.clone());
        Ok(())
    }
}

fn apply_world_state<S: StateDb>(state: &mut S, world_state: &WorldState) {
    for (address, account) in world_state.iter() {
        if !state.exist(*address) {
            state.create_account(*address);
        }
        state.set_balance_via_delta(*address, account.balance);
        state.set_nonce(*address, account.nonce);
        if !account.code.is_empty() {
            state.set_code(*address, account.code.clone());
        }
        for (key, value) in &account.storage {
            state.set_state(*address, *key, *value);
        }
    }
}

/// `StateDb` exposes balance mutation only via `AddBalance`/`SubBalance`;
/// this extension trait lets the substate processor set an absolute target
/// balance the same way a bulk loader would.
trait AbsoluteBalance {
    fn set_balance_via_delta(&mut self, address: alloy::primitives::Address, target: alloy::primitives::U256);
}

impl<S: StateDb> AbsoluteBalance for S {
    fn set_balance_via_delta(&mut self, address: alloy::primitives::Address, target: alloy::primitives::U256) {
        let current = self.get_balance(address);
        if target >= current {
            self.add_balance(address, target - current);
        } else {
            self.sub_balance(address, current - target);
        }
    }
}
