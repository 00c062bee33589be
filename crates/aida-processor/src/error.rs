/// Failures raised while evaluating a single transaction (§4.2). The
/// executor classifies these into the run-level taxonomy (§7) — typically
/// `RunError::Execution`.
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("nonce mismatch for sender: expected {expected}, found {found}")]
    NonceMismatch { expected: u64, found: u64 },
    #[error("state-db operation failed: {0}")]
    StateDb(#[from] aida_statedb::StateDbError),
}
