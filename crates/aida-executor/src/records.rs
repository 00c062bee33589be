use aida_context::RunError;
use aida_provider::{ProviderError, TxProvider};
use aida_types::TxInfo;

/// Buffers a provider's ascending `(block, tx)` stream into a `Vec`. The
/// provider contract only requires `run` to visit records in order; the
/// in-memory providers shipped in this repo already hold everything in
/// memory, so collecting here costs nothing extra and lets the executor
/// reason about whole blocks at a time.
pub fn collect_records(provider: &dyn TxProvider, first: u64, last: u64) -> Result<Vec<TxInfo>, RunError> {
    let mut records = Vec::new();
    provider
        .run(first, last, &mut |info| {
            records.push(info);
            Ok::<(), ProviderError>(())
        })
        .map_err(|e| RunError::Resource(e.to_string()))?;
    Ok(records)
}

/// Groups an already block/tx-ascending record stream into contiguous
/// per-block runs, preserving order.
pub fn group_by_block(records: Vec<TxInfo>) -> Vec<(u64, Vec<TxInfo>)> {
    let mut groups: Vec<(u64, Vec<TxInfo>)> = Vec::new();
    for record in records {
        match groups.last_mut() {
            Some((block, txs)) if *block == record.block => txs.push(record),
            _ => groups.push((record.block, vec![record])),
        }
    }
    groups
}
