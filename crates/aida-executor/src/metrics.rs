use vise::{Counter, Metrics};

/// Ambient instrumentation points for the core pipeline (SPEC_FULL.md
/// §10.4). Only the instrumentation itself is in scope — which backend
/// scrapes `ENGINE_METRICS` is an external collaborator's concern, the same
/// split the teacher draws around `BlockReplayRocksDBMetrics`.
#[derive(Debug, Metrics)]
#[metrics(prefix = "aida_engine")]
pub struct EngineMetrics {
    pub blocks_processed: Counter,
    pub transactions_processed: Counter,
    pub block_failures: Counter,
}

#[vise::register]
pub static ENGINE_METRICS: vise::Global<EngineMetrics> = vise::Global::new();
