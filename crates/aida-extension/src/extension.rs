use aida_context::{RunContext, RunError};
use aida_statedb::StateDb;
use aida_types::TxInfo;

/// Polymorphic over the six-hook capability set (§4.3). Every method has a
/// no-op default so a partial implementation only overrides the hooks it
/// cares about.
pub trait Extension<S: StateDb> {
    fn pre_run(&mut self, _ctx: &mut RunContext<S>) -> Result<(), RunError> {
        Ok(())
    }

    /// Additionally receives the run's final error, if any.
    fn post_run(&mut self, _ctx: &mut RunContext<S>, _run_result: Option<&RunError>) -> Result<(), RunError> {
        Ok(())
    }

    fn pre_block(&mut self, _block: u64, _ctx: &mut RunContext<S>) -> Result<(), RunError> {
        Ok(())
    }

    fn post_block(&mut self, _block: u64, _ctx: &mut RunContext<S>) -> Result<(), RunError> {
        Ok(())
    }

    fn pre_transaction(&mut self, _tx: &TxInfo, _ctx: &mut RunContext<S>) -> Result<(), RunError> {
        Ok(())
    }

    fn post_transaction(&mut self, _tx: &TxInfo, _ctx: &mut RunContext<S>) -> Result<(), RunError> {
        Ok(())
    }
}
