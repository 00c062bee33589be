/// Failures surfaced by a `StateDb`/`ArchiveView`/`BulkLoad` implementation.
///
/// This is the `ResourceError` arm of spec.md §7's error taxonomy where the
/// failure originates at the database boundary (scope acquisition, archive
/// lookup, commit). Callers upstream (executor, primer, validator) decide
/// whether a given `StateDbError` is fatal or tolerable under
/// `ContinueOnFailure` — the error type itself only carries *what* failed.
#[derive(Debug, thiserror::Error)]
pub enum StateDbError {
    #[error("failed to begin scope: {0}")]
    BeginScope(String),
    #[error("failed to end scope: {0}")]
    EndScope(String),
    #[error("archive state for block {0} is unavailable: {1}")]
    ArchiveUnavailable(u64, String),
    #[error("archive is empty")]
    ArchiveEmpty,
    #[error("commit failed: {0}")]
    Commit(String),
    #[error("bulk load failed: {0}")]
    BulkLoad(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
