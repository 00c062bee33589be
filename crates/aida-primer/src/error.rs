use aida_statedb::StateDbError;

#[derive(Debug, thiserror::Error)]
pub enum PrimeError {
    #[error("state-db error while priming: {0}")]
    StateDb(#[from] StateDbError),
    #[error("priming target {target} precedes starting block {start}")]
    InvertedRange { start: u64, target: u64 },
}
