use crate::metrics::{InquirerMetrics, InquirerSnapshot};
use crate::recent_buffer::RecentTxBuffer;
use crate::throttler::TokenBucket;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub struct ArchiveInquirerConfig {
    /// `ArchiveMaxQueryAge`: how many blocks behind the current height a
    /// sampled replay's archive view may be rooted at.
    pub max_age: u64,
    pub events_per_second: f64,
    pub seed: u64,
}

/// Replays a previously observed `(block, tx)` coordinate against an
/// archive view rooted at `archive_block`, returning gas used.
pub type ReplayFn = dyn Fn(u64, u32, u64) -> Result<u64, String> + Send + Sync;

/// Reports the current chain height the archive has reached.
pub type HeightFn = dyn Fn() -> u64 + Send + Sync;

/// Background load generator independent of the main pipeline (§4.4). Its
/// lifecycle is `PreRun`-starts / `PostRun`-joins; errors inside the loop
/// are logged, never surfaced, per spec.
pub struct ArchiveInquirer {
    stop: Arc<AtomicBool>,
    join_handle: Option<JoinHandle<()>>,
    metrics: Arc<InquirerMetrics>,
    started_at: Instant,
}

impl ArchiveInquirer {
    /// Starts the background loop (`PreRun`). Callers are responsible for
    /// verifying the active state DB is archive-capable before calling
    /// this — the inquirer itself only knows about the `height`/`replay`
    /// closures it is given.
    pub fn start(
        config: ArchiveInquirerConfig,
        buffer: Arc<Mutex<RecentTxBuffer>>,
        height: Arc<HeightFn>,
        replay: Arc<ReplayFn>,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let metrics = Arc::new(InquirerMetrics::default());
        let stop_loop = stop.clone();
        let metrics_loop = metrics.clone();

        let join_handle = thread::spawn(move || {
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
            let mut throttle = TokenBucket::new(config.events_per_second);

            while !stop_loop.load(Ordering::Relaxed) {
                if !throttle.try_take() {
                    thread::sleep(Duration::from_millis(5));
                    continue;
                }

                let sample = {
                    let guard = buffer.lock().expect("archive inquirer buffer poisoned");
                    if guard.is_empty() {
                        None
                    } else {
                        guard.sample(rng.random_range(0..guard.len()))
                    }
                };
                let Some((tx_block, tx_index)) = sample else {
                    thread::sleep(Duration::from_millis(5));
                    continue;
                };

                let current_height = height();
                if current_height == 0 {
                    thread::sleep(Duration::from_millis(5));
                    continue;
                }
                let low = current_height.saturating_sub(config.max_age).max(1);
                let archive_block = if low >= current_height {
                    current_height
                } else {
                    rng.random_range(low..=current_height)
                };

                let started = Instant::now();
                match replay(tx_block, tx_index, archive_block) {
                    Ok(gas_used) => metrics_loop.record(gas_used, started.elapsed()),
                    Err(error) => {
                        tracing::debug!(tx_block, tx_index, archive_block, %error, "archive inquirer replay failed");
                    }
                }
            }
        });

        Self { stop, join_handle: Some(join_handle), metrics, started_at: Instant::now() }
    }

    pub fn metrics(&self) -> InquirerSnapshot {
        self.metrics.snapshot(self.started_at.elapsed())
    }

    /// Signals completion and waits for the background thread to exit
    /// (`PostRun`).
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ArchiveInquirer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_loop_records_replays_and_stops_cleanly() {
        let mut buffer = RecentTxBuffer::new(8);
        buffer.push(10, 1);
        buffer.push(11, 2);
        let buffer = Arc::new(Mutex::new(buffer));

        let height: Arc<HeightFn> = Arc::new(|| 20);
        let replay: Arc<ReplayFn> = Arc::new(|_block, _tx, _archive_block| Ok(21_000));

        let config = ArchiveInquirerConfig { max_age: 5, events_per_second: 200.0, seed: 7 };
        let mut inquirer = ArchiveInquirer::start(config, buffer, height, replay);

        thread::sleep(Duration::from_millis(50));
        inquirer.stop();

        let snapshot = inquirer.metrics();
        assert!(snapshot.transactions_per_second >= 0.0);
    }
}
