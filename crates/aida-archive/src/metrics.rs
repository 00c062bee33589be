use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Throughput counters for the archive inquirer's background loop:
/// transactions/s, million-gas/s, and average per-replay duration (§4.4).
#[derive(Debug, Default)]
pub struct InquirerMetrics {
    transactions: AtomicU64,
    gas_used: AtomicU64,
    duration_nanos: AtomicU64,
}

impl InquirerMetrics {
    pub fn record(&self, gas_used: u64, duration: Duration) {
        self.transactions.fetch_add(1, Ordering::Relaxed);
        self.gas_used.fetch_add(gas_used, Ordering::Relaxed);
        self.duration_nanos.fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self, elapsed: Duration) -> InquirerSnapshot {
        let transactions = self.transactions.load(Ordering::Relaxed);
        let gas_used = self.gas_used.load(Ordering::Relaxed);
        let duration_nanos = self.duration_nanos.load(Ordering::Relaxed);
        let elapsed_secs = elapsed.as_secs_f64().max(f64::EPSILON);

        InquirerSnapshot {
            transactions_per_second: transactions as f64 / elapsed_secs,
            mgas_per_second: (gas_used as f64 / 1_000_000.0) / elapsed_secs,
            average_duration: if transactions == 0 {
                Duration::ZERO
            } else {
                Duration::from_nanos(duration_nanos / transactions)
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InquirerSnapshot {
    pub transactions_per_second: f64,
    pub mgas_per_second: f64,
    pub average_duration: Duration,
}
