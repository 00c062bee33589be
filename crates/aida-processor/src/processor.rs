use crate::error::ProcessorError;
use aida_context::RunContext;
use aida_statedb::StateDb;
use aida_types::TxInfo;

/// Executes one transaction against a state view (§4.2). Implementations
/// must call `SetTxContext` with a hash derived from `(block, tx)`, honor
/// `SkipNonceChecks`, populate `ctx.execution_result`, and — for the
/// `PseudoTx` sentinel — neither snapshot nor produce a receipt.
pub trait Processor<S: StateDb> {
    fn process(&self, tx: &TxInfo, ctx: &mut RunContext<S>) -> Result<(), ProcessorError>;
}
