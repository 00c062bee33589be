use crate::error::ValidationError;
use aida_context::{RunContext, RunError};
use aida_extension::Extension;
use aida_statedb::StateDb;
use aida_types::{Account, TxInfo, WorldState};
use alloy::primitives::Address;

/// Cross-checks a transaction's recorded world-state projections against
/// the live state DB (spec.md §6 `ValidateTxState`): `input_state` just
/// before `Process` runs, `output_state` just after.
#[derive(Debug, Default)]
pub struct WorldStateValidator;

impl WorldStateValidator {
    pub fn new() -> Self {
        Self
    }
}

/// Describes the first way `account` disagrees with what `state` actually
/// holds at `address`, or `None` if they agree.
fn account_mismatch<S: StateDb>(state: &S, address: Address, account: &Account) -> Option<String> {
    if !state.exist(address) {
        return Some(format!("Account {address} does not exist"));
    }
    if state.get_nonce(address) != account.nonce {
        return Some(format!(
            "Account {address} nonce mismatch: want {}, have {}",
            account.nonce,
            state.get_nonce(address)
        ));
    }
    if state.get_balance(address) != account.balance {
        return Some(format!(
            "Account {address} balance mismatch: want {}, have {}",
            account.balance,
            state.get_balance(address)
        ));
    }
    if state.get_code(address) != account.code {
        return Some(format!("Account {address} code mismatch"));
    }
    for (key, value) in &account.storage {
        if state.get_state(address, *key) != *value {
            return Some(format!("Account {address} storage slot {key} mismatch"));
        }
    }
    None
}

fn check<S: StateDb>(label: &str, world_state: &WorldState, block: u64, tx: u32, state: &S) -> Result<(), ValidationError> {
    for (address, account) in world_state.iter() {
        if let Some(detail) = account_mismatch(state, *address, account) {
            let message = format!(
                "archive-db-validator err:\nblock {block} tx {tx}\n world-state {label} is not contained in the state-db\n   {detail}"
            );
            return Err(ValidationError::WorldStateMismatch { message });
        }
    }
    Ok(())
}

impl<S: StateDb> Extension<S> for WorldStateValidator {
    fn pre_transaction(&mut self, tx: &TxInfo, ctx: &mut RunContext<S>) -> Result<(), RunError> {
        check("input", &tx.data.input_state, tx.block, tx.tx, &ctx.state)
            .map_err(|e| RunError::Validation(e.to_string()))
    }

    fn post_transaction(&mut self, tx: &TxInfo, ctx: &mut RunContext<S>) -> Result<(), RunError> {
        check("output", &tx.data.output_state, tx.block, tx.tx, &ctx.state)
            .map_err(|e| RunError::Validation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aida_aux_db::InMemoryAuxDb;
    use aida_context::ErrorSink;
    use aida_memdb::MemStateDb;
    use aida_types::{BlockEnvironment, ExecutionResult, Message, TxContext};
    use alloy::primitives::{U256, address};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn context() -> RunContext<MemStateDb> {
        RunContext::new(
            MemStateDb::new(),
            Arc::new(InMemoryAuxDb::new()),
            PathBuf::from("/tmp/aida-test"),
            Arc::new(ErrorSink::new(8, 1000)),
        )
    }

    fn env() -> BlockEnvironment {
        BlockEnvironment {
            coinbase: Address::ZERO,
            difficulty: Default::default(),
            gas_limit: 30_000_000,
            number: 2,
            timestamp: 0,
            base_fee: None,
            blob_base_fee: None,
            random: None,
            recent_block_hashes: Default::default(),
            fork: "shanghai".into(),
        }
    }

    fn message() -> Message {
        Message {
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
            skip_nonce_checks: true,
        }
    }

    fn tx_with_input_state(input_state: WorldState) -> TxInfo {
        TxInfo {
            block: 2,
            tx: 1,
            data: TxContext {
                input_state,
                output_state: WorldState::new(),
                block_environment: env(),
                message: message(),
                result: ExecutionResult::empty_success(),
            },
        }
    }

    #[test]
    fn missing_account_fails_with_scenario_message() {
        let address = address!("0100000000000000000000000000000000000000");
        let mut input_state = WorldState::new();
        input_state.insert(address, Account::new(1, U256::from(1), vec![]));
        let tx = tx_with_input_state(input_state);

        let mut validator = WorldStateValidator::new();
        let mut ctx = context();
        let result = <WorldStateValidator as Extension<MemStateDb>>::pre_transaction(&mut validator, &tx, &mut ctx);

        let error = result.unwrap_err();
        let RunError::Validation(message) = error else { panic!("expected a validation error, got {error:?}") };
        assert!(
            message.starts_with(
                "archive-db-validator err:\nblock 2 tx 1\n world-state input is not contained in the state-db\n   Account"
            ),
            "unexpected message: {message}"
        );
        assert!(message.ends_with("does not exist"), "unexpected message: {message}");
    }

    #[test]
    fn matching_input_state_passes() {
        let address = address!("0100000000000000000000000000000000000000");
        let mut ctx = context();
        ctx.state.begin_block(2).unwrap();
        ctx.state.begin_transaction(1).unwrap();
        ctx.state.create_account(address);
        ctx.state.set_nonce(address, 1);
        ctx.state.add_balance(address, U256::from(1));

        let mut input_state = WorldState::new();
        input_state.insert(address, Account::new(1, U256::from(1), vec![]));
        let tx = tx_with_input_state(input_state);

        let mut validator = WorldStateValidator::new();
        <WorldStateValidator as Extension<MemStateDb>>::pre_transaction(&mut validator, &tx, &mut ctx).unwrap();
    }
}
