/// The run-level error taxonomy (§7). Classification, not transport: each
/// crate that detects a failure picks the variant, and [`crate::ErrorSink`]
/// decides whether continue-on-failure applies.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RunError {
    /// Failed to acquire a DB handle, archive view, or iterator — fatal at
    /// the scope that failed.
    #[error("resource error: {0}")]
    Resource(String),
    /// Internal invariant broken (`nextBlock` mismatch, unknown exception
    /// scope) — always fatal.
    #[error("ordering error: {0}")]
    Ordering(String),
    /// Pre- or post-state disagreement. Tolerated under continue-on-failure
    /// until the error counter reaches its configured maximum.
    #[error("validation error: {0}")]
    Validation(String),
    /// Processor-reported failure (e.g. intrinsic gas too low). Same policy
    /// as `Validation`.
    #[error("execution error: {0}")]
    Execution(String),
    /// Live or archive state-root mismatch. Never tolerated.
    #[error("state-root mismatch: {0}")]
    HashMismatch(String),
}

impl RunError {
    /// Whether this class is ever eligible for continue-on-failure routing.
    /// `Ordering` and `HashMismatch` are always fatal regardless of policy.
    pub fn is_tolerable(&self) -> bool {
        matches!(self, RunError::Validation(_) | RunError::Execution(_))
    }
}
