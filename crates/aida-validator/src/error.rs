/// Internal failure modes the validator can hit before they're folded into
/// a [`aida_context::RunError`] at the [`aida_extension::Extension`]
/// boundary every other crate's hook returns through.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("state-db error while validating: {0}")]
    StateDb(String),
    #[error("live state root mismatch at block {block}")]
    LiveRootMismatch { block: u64 },
    #[error("archive block {block} root mismatch")]
    ArchiveRootMismatch { block: u64 },
    /// A recorded input/output world-state projection disagrees with the
    /// live state DB. `message` is already formatted in full
    /// (`archive-db-validator err:\n...`) since its exact wording is a
    /// tested contract (spec.md §8 scenario 3).
    #[error("{message}")]
    WorldStateMismatch { message: String },
}
