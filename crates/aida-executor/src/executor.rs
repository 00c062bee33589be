use crate::metrics::ENGINE_METRICS;
use crate::records::{collect_records, group_by_block};
use aida_context::{RunContext, RunError};
use aida_extension::ExtensionChain;
use aida_processor::Processor;
use aida_provider::TxProvider;
use aida_statedb::StateDb;
use aida_types::{PSEUDO_TX, TxInfo, derive_block_hash};
use alloy::primitives::{Address, B256, U256, address};

/// EIP-2935 history storage contract address.
const HISTORY_STORAGE_ADDRESS: Address = address!("0000f90827f1c53a10cb7a02335b175320002935");
/// EIP-2935 `HISTORY_SERVE_WINDOW`: number of recent block hashes retained.
const HISTORY_SERVE_WINDOW: u64 = 8192;

/// Drives the state machine in §4.4: `PreRun -> (PreBlock -> (PreTx ->
/// Process -> PostTx)* -> PostBlock)* -> PostRun`, with strictly nested
/// scope bracketing on the state view and, in archive mode, on the archive
/// view.
pub struct Executor<P> {
    processor: P,
    archive_mode: bool,
    /// First block at which the parent-block-hash history write (§11.5)
    /// activates. `None` disables the step entirely.
    prague_activation_block: Option<u64>,
}

impl<P> Executor<P> {
    pub fn new(processor: P, archive_mode: bool) -> Self {
        Self { processor, archive_mode, prague_activation_block: None }
    }

    pub fn with_prague_activation_block(mut self, block: u64) -> Self {
        self.prague_activation_block = Some(block);
        self
    }

    /// Records the parent block's hash into the EIP-2935 history contract's
    /// storage, the way post-Prague forks do it as an implicit system
    /// transaction at the start of every block. No-op before the configured
    /// activation block or at genesis, where there is no parent.
    fn record_parent_block_hash<S: StateDb>(&self, block: u64, ctx: &mut RunContext<S>) -> Result<(), RunError> {
        let Some(activation) = self.prague_activation_block else { return Ok(()) };
        if block < activation || block == 0 {
            return Ok(());
        }
        let parent = block - 1;
        let parent_hash = derive_block_hash(parent);

        ctx.state.begin_transaction(PSEUDO_TX).map_err(|e| RunError::Resource(e.to_string()))?;
        let slot = B256::from(U256::from(parent % HISTORY_SERVE_WINDOW));
        ctx.state.set_state(HISTORY_STORAGE_ADDRESS, slot, parent_hash);
        ctx.state.end_transaction().map_err(|e| RunError::Resource(e.to_string()))?;
        Ok(())
    }

    /// Sequential mode (workers = 1): blocks execute strictly in ascending
    /// order, and every extension hook / state-DB scope event is issued in
    /// the single exact order the spec prescribes.
    pub fn run_sequential<S: StateDb>(
        &self,
        provider: &dyn TxProvider,
        chain: &mut ExtensionChain<S>,
        ctx: &mut RunContext<S>,
        first: u64,
        last: u64,
    ) -> Result<(), RunError>
    where
        P: Processor<S>,
    {
        let records = collect_records(provider, first, last)?;
        let blocks = group_by_block(records);
        self.drive(chain, ctx, blocks.iter().map(|(b, txs)| (*b, txs.as_slice())))
    }

    /// Parallel mode (workers > 1): blocks are partitioned round-robin
    /// across `workers` virtual workers and interleaved turn by turn, so
    /// the overall block order is no longer strictly ascending while each
    /// worker's own subset still executes in ascending order — the only
    /// externally observable difference from sequential mode (§4.4).
    ///
    /// This reference executor simulates the worker interleaving on a
    /// single thread: the spec's contract is about emitted event order,
    /// not wall-clock concurrency, and the live state DB is serialized
    /// through its scope state regardless of how many OS threads drive it.
    pub fn run_parallel<S: StateDb>(
        &self,
        provider: &dyn TxProvider,
        chain: &mut ExtensionChain<S>,
        ctx: &mut RunContext<S>,
        first: u64,
        last: u64,
        workers: usize,
    ) -> Result<(), RunError>
    where
        P: Processor<S>,
    {
        let workers = workers.max(1);
        let records = collect_records(provider, first, last)?;
        let blocks = group_by_block(records);

        let mut buckets: Vec<Vec<(u64, Vec<TxInfo>)>> = vec![Vec::new(); workers];
        for (index, group) in blocks.into_iter().enumerate() {
            buckets[index % workers].push(group);
        }

        let interleaved = interleave(buckets);
        self.drive(chain, ctx, interleaved.iter().map(|(b, txs)| (*b, txs.as_slice())))
    }

    fn drive<'a, S: StateDb>(
        &self,
        chain: &mut ExtensionChain<S>,
        ctx: &mut RunContext<S>,
        blocks: impl Iterator<Item = (u64, &'a [TxInfo])>,
    ) -> Result<(), RunError>
    where
        P: Processor<S>,
    {
        ctx.state.begin_sync_period(0);

        let mut run_error = chain.pre_run(ctx).err();

        if run_error.is_none() {
            for (block, txs) in blocks {
                if let Err(error) = self.execute_block(chain, block, txs, ctx) {
                    tracing::warn!(block, %error, "block execution failed, aborting run");
                    run_error = Some(error);
                    break;
                }
            }
        }

        let post_run_result = chain.post_run(ctx, run_error.as_ref());
        ctx.state.end_sync_period();

        run_error.map(Err).unwrap_or(post_run_result)
    }

    fn execute_block<S: StateDb>(
        &self,
        chain: &mut ExtensionChain<S>,
        block: u64,
        txs: &[TxInfo],
        ctx: &mut RunContext<S>,
    ) -> Result<(), RunError>
    where
        P: Processor<S>,
    {
        if let Err(e) = ctx.state.begin_block(block) {
            return Err(RunError::Resource(e.to_string()));
        }

        if let Err(e) = self.record_parent_block_hash(block, ctx) {
            let _ = ctx.state.end_block();
            return Err(e);
        }

        let mut archive_error = None;
        if self.archive_mode {
            match ctx.state.get_archive_state(block.saturating_sub(1)) {
                Ok(view) => ctx.archive = Some(view),
                Err(e) => archive_error = Some(RunError::Resource(e.to_string())),
            }
        }

        let (pre_succeeded, pre_result) =
            if archive_error.is_none() { chain.pre_block(block, ctx) } else { (0, Ok(())) };

        // Continue-on-failure (§5, §7, invariant I7): a tolerable tx error
        // (Validation/Execution) is routed through `error_input` instead of
        // aborting the block. It only turns fatal once the sink rejects it
        // — not a tolerable class, already at `MaxNumErrors`, or the
        // buffered channel is full — at which point replay stops here.
        let mut tx_error = None;
        if archive_error.is_none() && pre_result.is_ok() {
            for tx in txs {
                if let Err(e) = self.execute_transaction(chain, tx, ctx) {
                    if let Err(fatal) = ctx.error_input.report(e) {
                        tx_error = Some(fatal);
                        break;
                    }
                    tracing::warn!(block, tx = tx.tx, "tolerated transaction error under continue-on-failure");
                }
            }
        }

        let post_result = chain.post_block(pre_succeeded, block, ctx);

        if self.archive_mode {
            if let Some(view) = ctx.take_archive() {
                view.release();
            }
        }

        let end_block_error =
            ctx.state.end_block().err().map(|e| RunError::Resource(e.to_string()));

        let result = first_error([archive_error, pre_result.err(), tx_error, post_result.err(), end_block_error]);
        if result.is_ok() {
            ENGINE_METRICS.blocks_processed.inc();
        } else {
            ENGINE_METRICS.block_failures.inc();
        }
        result
    }

    fn execute_transaction<S: StateDb>(
        &self,
        chain: &mut ExtensionChain<S>,
        tx: &TxInfo,
        ctx: &mut RunContext<S>,
    ) -> Result<(), RunError>
    where
        P: Processor<S>,
    {
        if let Err(e) = ctx.state.begin_transaction(tx.tx) {
            return Err(RunError::Resource(e.to_string()));
        }
        if self.archive_mode {
            if let Some(archive) = ctx.archive.as_mut() {
                if let Err(e) = archive.begin_transaction(tx.tx) {
                    return Err(RunError::Resource(e.to_string()));
                }
            }
        }

        let (pre_succeeded, pre_result) = chain.pre_transaction(tx, ctx);

        let process_result = if pre_result.is_ok() {
            self.processor.process(tx, ctx).err().map(|e| RunError::Execution(e.to_string()))
        } else {
            None
        };

        let post_result = chain.post_transaction(pre_succeeded, tx, ctx);

        if self.archive_mode {
            if let Some(archive) = ctx.archive.as_mut() {
                let _ = archive.end_transaction();
            }
        }

        let end_tx_error =
            ctx.state.end_transaction().err().map(|e| RunError::Resource(e.to_string()));

        let result = first_error([pre_result.err(), process_result, post_result.err(), end_tx_error]);
        if result.is_ok() {
            ENGINE_METRICS.transactions_processed.inc();
        }
        result
    }
}

fn first_error<const N: usize>(errors: [Option<RunError>; N]) -> Result<(), RunError> {
    for error in errors.into_iter().flatten() {
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aida_aux_db::InMemoryAuxDb;
    use aida_context::ErrorSink;
    use aida_extension::ExtensionChain;
    use aida_memdb::MemStateDb;
    use aida_processor::SubstateProcessor;
    use aida_provider::VecTxProvider;
    use aida_types::{Account, BlockEnvironment, ExecutionResult, Message, TxContext, WorldState, PSEUDO_TX};
    use alloy::primitives::{Address, U256, address};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn env(block: u64) -> BlockEnvironment {
        BlockEnvironment {
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
        }
    }

    fn message(sender: Address, skip: bool) -> Message {
        Message {
            sender,
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
            skip_nonce_checks: skip,
        }
    }

    fn record(block: u64, tx: u32, beneficiary: Address, amount: U256) -> TxInfo {
        let mut output = WorldState::new();
        output.insert(beneficiary, Account::new(0, amount, vec![]));
        TxInfo {
            block,
            tx,
            data: TxContext {
                input_state: WorldState::new(),
                output_state: output,
                block_environment: env(block),
                message: message(Address::ZERO, true),
                result: ExecutionResult::empty_success(),
            },
        }
    }

    fn context() -> RunContext<MemStateDb> {
        RunContext::new(
            MemStateDb::new(),
            Arc::new(InMemoryAuxDb::new()),
            PathBuf::from("/tmp/aida-test"),
            Arc::new(ErrorSink::new(8, 1000)),
        )
    }

    #[test]
    fn sequential_run_applies_every_block_in_order() {
        let beneficiary = address!("0000000000000000000000000000000000000042");
        let provider = VecTxProvider::new(vec![
            record(2, 0, beneficiary, U256::from(10)),
            record(3, PSEUDO_TX, beneficiary, U256::from(5)),
        ]);
        let executor = Executor::new(SubstateProcessor, false);
        let mut chain = ExtensionChain::<MemStateDb>::new(vec![]);
        let mut ctx = context();

        executor.run_sequential(&provider, &mut chain, &mut ctx, 2, 4).unwrap();
        assert_eq!(ctx.state.get_balance(beneficiary), U256::from(5));
    }

    #[test]
    fn parallel_run_visits_every_block_exactly_once() {
        let beneficiary = address!("0000000000000000000000000000000000000042");
        let provider = VecTxProvider::new(vec![
            record(2, 0, beneficiary, U256::from(1)),
            record(3, 0, beneficiary, U256::from(2)),
            record(4, 0, beneficiary, U256::from(3)),
        ]);
        let executor = Executor::new(SubstateProcessor, false);
        let mut chain = ExtensionChain::<MemStateDb>::new(vec![]);
        let mut ctx = context();

        executor.run_parallel(&provider, &mut chain, &mut ctx, 2, 5, 2).unwrap();
        assert_eq!(ctx.state.get_balance(beneficiary), U256::from(3));
    }

    /// Fails `pre_transaction` with a tolerable `RunError::Validation` for
    /// every transaction numbered `failing_tx`.
    struct FailEveryTx {
        failing_tx: u32,
    }

    impl Extension<MemStateDb> for FailEveryTx {
        fn pre_transaction(&mut self, tx: &TxInfo, _ctx: &mut RunContext<MemStateDb>) -> Result<(), RunError> {
            if tx.tx == self.failing_tx {
                Err(RunError::Validation("synthetic failure".into()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn continue_on_failure_tolerates_errors_up_to_max_and_keeps_replaying() {
        let beneficiary = address!("0000000000000000000000000000000000000042");
        let provider = VecTxProvider::new(vec![
            record(2, 0, beneficiary, U256::from(1)),
            record(3, 0, beneficiary, U256::from(2)),
            record(4, 0, beneficiary, U256::from(3)),
        ]);
        let executor = Executor::new(SubstateProcessor, false);
        let mut chain = ExtensionChain::<MemStateDb>::new(vec![Box::new(FailEveryTx { failing_tx: 0 })]);
        let mut ctx = RunContext::new(
            MemStateDb::new(),
            Arc::new(InMemoryAuxDb::new()),
            PathBuf::from("/tmp/aida-test"),
            Arc::new(ErrorSink::new(8, 10)),
        );

        executor.run_sequential(&provider, &mut chain, &mut ctx, 2, 5).unwrap();
        assert_eq!(ctx.error_input.error_count(), 3);
        assert_eq!(ctx.state.get_balance(beneficiary), U256::ZERO);
    }

    #[test]
    fn continue_on_failure_off_aborts_on_the_first_tolerable_error() {
        let beneficiary = address!("0000000000000000000000000000000000000042");
        let provider = VecTxProvider::new(vec![
            record(2, 0, beneficiary, U256::from(1)),
            record(3, 0, beneficiary, U256::from(2)),
        ]);
        let executor = Executor::new(SubstateProcessor, false);
        let mut chain = ExtensionChain::<MemStateDb>::new(vec![Box::new(FailEveryTx { failing_tx: 0 })]);
        let mut ctx = RunContext::new(
            MemStateDb::new(),
            Arc::new(InMemoryAuxDb::new()),
            PathBuf::from("/tmp/aida-test"),
            Arc::new(ErrorSink::new(8, 0)),
        );

        let result = executor.run_sequential(&provider, &mut chain, &mut ctx, 2, 4);
        assert!(matches!(result, Err(RunError::Validation(_))));
        assert_eq!(ctx.error_input.error_count(), 1);
    }
}

/// Round-robin-merges per-worker block buckets into a single interleaved
/// sequence: one block from worker 0, one from worker 1, …, then back to
/// worker 0, until every bucket is drained.
fn interleave(buckets: Vec<Vec<(u64, Vec<TxInfo>)>>) -> Vec<(u64, Vec<TxInfo>)> {
    let mut iters: Vec<_> = buckets.into_iter().map(|b| b.into_iter()).collect();
    let mut out = Vec::new();
    loop {
        let mut any = false;
        for iter in iters.iter_mut() {
            if let Some(item) = iter.next() {
                out.push(item);
                any = true;
            }
        }
        if !any {
            break;
        }
    }
    out
}
