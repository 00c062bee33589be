use vise::{Counter, Metrics};

/// Priming-side half of the ambient instrumentation (SPEC_FULL.md §10.4):
/// how many times the in-memory delta buffer was flushed into the state DB
/// over the lifetime of the process, across every `prime` call.
#[derive(Debug, Metrics)]
#[metrics(prefix = "aida_primer")]
pub struct PrimerMetrics {
    pub buffer_flushes: Counter,
}

#[vise::register]
pub static PRIMER_METRICS: vise::Global<PrimerMetrics> = vise::Global::new();
