use crate::error_sink::ErrorSink;
use aida_aux_db::AuxDb;
use aida_statedb::StateDb;
use aida_types::ExecutionResult;
use std::path::PathBuf;
use std::sync::Arc;

/// Created once per run, mutated by extensions and the processor, destroyed
/// after `PostRun` (§3, lifecycle table). Generic over the concrete
/// [`StateDb`] backend so the executor can run against any implementation
/// without a trait-object indirection on the hot path.
pub struct RunContext<S: StateDb> {
    pub state: S,
    /// The currently acquired non-committable archive view (archive mode
    /// only). Present between `PreBlock` and `PostBlock`.
    pub archive: Option<S::Archive>,
    pub aida_db: Arc<dyn AuxDb + Send + Sync>,
    pub state_db_path: PathBuf,
    pub execution_result: Option<ExecutionResult>,
    pub error_input: Arc<ErrorSink>,
}

impl<S: StateDb> RunContext<S> {
    pub fn new(
        state: S,
        aida_db: Arc<dyn AuxDb + Send + Sync>,
        state_db_path: PathBuf,
        error_input: Arc<ErrorSink>,
    ) -> Self {
        Self { state, archive: None, aida_db, state_db_path, execution_result: None, error_input }
    }

    /// Takes the archive view acquired for the current block, leaving
    /// `None` behind — the shape the archive prepper's `PostBlock` hook
    /// needs before it can call `Release` (§4.4).
    pub fn take_archive(&mut self) -> Option<S::Archive> {
        self.archive.take()
    }

    pub fn take_execution_result(&mut self) -> Option<ExecutionResult> {
        self.execution_result.take()
    }
}
