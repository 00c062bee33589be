/// Failures surfaced by a [`crate::TxProvider`].
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("consumer aborted iteration: {0}")]
    Consumer(String),
    #[error("underlying record source failed: {0}")]
    Source(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
