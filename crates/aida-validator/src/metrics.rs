use vise::{Counter, Metrics};

/// Validator-side half of the ambient instrumentation (SPEC_FULL.md §10.4):
/// a running count of fatal state-root mismatches observed, live or
/// archive, across every run in the process.
#[derive(Debug, Metrics)]
#[metrics(prefix = "aida_validator")]
pub struct ValidatorMetrics {
    pub mismatches: Counter,
}

#[vise::register]
pub static VALIDATOR_METRICS: vise::Global<ValidatorMetrics> = vise::Global::new();
