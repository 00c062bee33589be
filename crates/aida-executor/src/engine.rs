use crate::executor::Executor;
use aida_aux_db::AuxDb;
use aida_context::{ErrorSink, RunConfig, RunContext, RunError};
use aida_corrector::ExceptionCorrector;
use aida_extension::{Extension, ExtensionChain};
use aida_primer::PrimerConfig;
use aida_processor::Processor;
use aida_provider::TxProvider;
use aida_statedb::StateDb;
use aida_validator::{StateHashValidator, WorldStateValidator};
use std::path::PathBuf;
use std::sync::Arc;

/// Everything that can go wrong running a replay end to end, at the single
/// seam an embedder actually calls through.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("priming failed: {0}")]
    Priming(#[from] aida_primer::PrimeError),
    #[error("run aborted: {0}")]
    Run(RunError),
}

/// Top-level facade (§10.2): wires priming, the exception corrector, the
/// state-hash and world-state validators, and the core pipeline into one
/// call an embedder can drive with nothing but a [`RunConfig`] and a state
/// DB. Equivalent to `PipelineComponent::run`'s role in the teacher's
/// pipeline crate — the single entry point whose signature the rest of the
/// stack is built to satisfy.
pub struct Engine<P> {
    executor: Executor<P>,
}

impl<P> Engine<P> {
    pub fn new(processor: P, config: &RunConfig) -> Self {
        Self { executor: Executor::new(processor, config.archive_mode) }
    }

    /// Enables the post-Prague parent-block-hash pseudo-transaction (§11.5)
    /// from `block` onward.
    pub fn with_prague_activation_block(mut self, block: u64) -> Self {
        self.executor = self.executor.with_prague_activation_block(block);
        self
    }

    /// Primes `state` up to `config.first` (if it isn't already there),
    /// then replays `[config.first, config.last)` through the extension
    /// chain and the processor, sequentially or across `config.workers`
    /// simulated workers. `extra_extensions` are spliced in as the
    /// outermost layer, ahead of the extensions every run conditionally
    /// carries: `StateHashValidator`, then `ExceptionCorrector`, then
    /// `WorldStateValidator` innermost — so the corrector's patch lands
    /// before `WorldStateValidator` checks `input_state` against it, and
    /// `StateHashValidator`'s root check runs after the corrector's
    /// post-block patch. See the module doc on `ExtensionChain` for why
    /// that nesting order matters.
    pub fn run<S: StateDb>(
        &self,
        provider: &dyn TxProvider,
        mut state: S,
        aux_db: Arc<dyn AuxDb + Send + Sync>,
        state_db_path: PathBuf,
        config: &RunConfig,
        priming_start: u64,
        mut extra_extensions: Vec<Box<dyn Extension<S>>>,
    ) -> anyhow::Result<()>
    where
        P: Processor<S>,
    {
        if priming_start < config.first {
            let primer_config = PrimerConfig {
                prime_random: config.prime_random,
                random_seed: config.random_seed,
                prime_threshold: config.prime_threshold,
                update_buffer_size: config.update_buffer_size,
            };
            aida_primer::prime(&mut state, aux_db.as_ref(), &primer_config, priming_start, config.first)
                .map_err(ExecError::Priming)?;
        }

        let error_sink = Arc::new(ErrorSink::new(1024, config.effective_max_errors()));
        let mut ctx = RunContext::new(state, aux_db, state_db_path, error_sink);

        let mut extensions: Vec<Box<dyn Extension<S>>> = Vec::new();
        extensions.append(&mut extra_extensions);
        if config.validate || config.validate_state_hashes {
            extensions.push(Box::new(StateHashValidator::new(config.archive_mode, config.first)));
        }
        extensions.push(Box::new(ExceptionCorrector::new(ctx.aida_db.clone(), config.first)));
        if config.validate_tx_state || config.validate {
            extensions.push(Box::new(WorldStateValidator::new()));
        }
        let mut chain = ExtensionChain::new(extensions);

        let result = if config.workers <= 1 {
            self.executor.run_sequential(provider, &mut chain, &mut ctx, config.first, config.last)
        } else {
            self.executor.run_parallel(provider, &mut chain, &mut ctx, config.first, config.last, config.workers)
        };

        result.map_err(ExecError::Run)?;
        Ok(())
    }
}
