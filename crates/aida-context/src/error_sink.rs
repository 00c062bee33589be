use crate::error::RunError;
use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::atomic::{AtomicU64, Ordering};

/// Bounded continue-on-failure error sink (§5, §7). Tolerable errors are
/// routed onto a bounded channel and counted against a process-wide
/// maximum; once the channel is full or the maximum is reached, the
/// reported error is handed back to the caller as fatal.
pub struct ErrorSink {
    sender: Sender<RunError>,
    receiver: Receiver<RunError>,
    count: AtomicU64,
    max_errors: u64,
}

impl ErrorSink {
    pub fn new(capacity: usize, max_errors: u64) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver, count: AtomicU64::new(0), max_errors }
    }

    /// Routes `error` through the sink. Returns `Ok(())` if it was
    /// tolerated, or hands `error` back as `Err` if it is not a tolerable
    /// class, the channel is full, or the error count has reached
    /// `max_errors`.
    pub fn report(&self, error: RunError) -> Result<(), RunError> {
        if !error.is_tolerable() {
            return Err(error);
        }
        let seen = self.count.fetch_add(1, Ordering::SeqCst) + 1;
        if seen >= self.max_errors {
            return Err(error);
        }
        self.sender.try_send(error.clone()).map_err(|_| error)
    }

    /// Drains every error buffered so far without blocking.
    pub fn drain(&self) -> Vec<RunError> {
        self.receiver.try_iter().collect()
    }

    pub fn error_count(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }
}
