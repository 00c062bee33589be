use crate::error::ProviderError;
use aida_types::TxInfo;

/// Ordered lazy source of [`TxInfo`] records (§4.1). A provider owns its
/// underlying iterator and releases it the moment `run` returns, whether
/// that is because the range was exhausted or because `consumer` returned
/// an error.
pub trait TxProvider {
    /// Invokes `consumer` once per record whose block satisfies
    /// `first <= block < last`, in strict `(block, tx)` ascending order.
    /// Stops early, without error, the first time `consumer` returns one.
    fn run(
        &self,
        first: u64,
        last: u64,
        consumer: &mut dyn FnMut(TxInfo) -> Result<(), ProviderError>,
    ) -> Result<(), ProviderError>;
}
