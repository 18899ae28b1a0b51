//! Byte-level progress tracking and ETA estimation.
//!
//! Workers add to a shared [`ByteProgressTracker`]; a [`ProgressEstimator`]
//! thread samples it on a fixed period and publishes percent complete and a
//! linear time-remaining estimate.

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default sampling period of the estimator.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

/// Shared counter of bytes processed across all workers of a run.
#[derive(Debug, Default)]
pub struct ByteProgressTracker {
    bytes_done: AtomicU64,
}

impl ByteProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add processed bytes.
    pub fn add(&self, n: u64) {
        self.bytes_done.fetch_add(n, Ordering::Relaxed);
    }

    /// Bytes processed so far.
    pub fn get(&self) -> u64 {
        self.bytes_done.load(Ordering::Relaxed)
    }
}

/// Estimated time remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Eta {
    /// No bytes processed yet.
    Calculating,
    /// Linear extrapolation from elapsed time.
    Remaining(Duration),
    /// The run has finished.
    Completed,
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Eta::Calculating => write!(f, "Estimated time: Calculating..."),
            Eta::Remaining(d) => write!(f, "Estimated time remaining: {} seconds", d.as_secs()),
            Eta::Completed => write!(f, "Completed."),
        }
    }
}

/// One published progress sample.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ProgressUpdate {
    /// Percent complete, 0 to 100.
    pub percent: f64,
    pub eta: Eta,
}

impl ProgressUpdate {
    /// The terminal state published once when a run finishes.
    pub fn completed() -> Self {
        Self { percent: 100.0, eta: Eta::Completed }
    }

    /// Compute percent complete and ETA from a counter sample.
    ///
    /// A zero `total_size` reports 0% with no estimate; runs never start with
    /// a zero total, so this only guards the division.
    pub fn sample(bytes_done: u64, total_size: u64, elapsed: Duration) -> Self {
        if total_size == 0 {
            return Self { percent: 0.0, eta: Eta::Calculating };
        }

        let percent = (bytes_done as f64 / total_size as f64 * 100.0).min(100.0);
        if percent <= 0.0 {
            return Self { percent, eta: Eta::Calculating };
        }

        let elapsed_secs = elapsed.as_secs_f64();
        let estimated_total = elapsed_secs / (percent / 100.0);
        let remaining = (estimated_total - elapsed_secs).max(0.0);

        Self {
            percent,
            // Tiny progress against a huge total can overflow Duration
            eta: Eta::Remaining(Duration::try_from_secs_f64(remaining).unwrap_or(Duration::MAX)),
        }
    }
}

/// Type alias for progress callback function
pub type ProgressCallback = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Periodic sampler of a [`ByteProgressTracker`].
pub struct ProgressEstimator {
    tracker: Arc<ByteProgressTracker>,
    total_size: u64,
    start_time: Instant,
    interval: Duration,
}

impl ProgressEstimator {
    pub fn new(tracker: Arc<ByteProgressTracker>, total_size: u64, start_time: Instant) -> Self {
        Self {
            tracker,
            total_size,
            start_time,
            interval: DEFAULT_SAMPLE_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Take one sample now.
    pub fn sample(&self) -> ProgressUpdate {
        ProgressUpdate::sample(self.tracker.get(), self.total_size, self.start_time.elapsed())
    }

    /// Start sampling on a dedicated thread.
    ///
    /// The thread publishes a sample immediately and then once per interval
    /// until [`EstimatorHandle::finish`] is called (or the handle is dropped),
    /// then publishes [`ProgressUpdate::completed`] once and exits.
    pub fn spawn(self, callback: ProgressCallback) -> EstimatorHandle {
        // Dropping the sender also counts as the completion signal
        let (done_tx, done_rx) = bounded::<()>(1);

        let handle = thread::spawn(move || {
            let mut samples = 0usize;
            loop {
                callback(self.sample());
                samples += 1;

                match done_rx.recv_timeout(self.interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!(samples, "progress estimator finished");
            callback(ProgressUpdate::completed());
        });

        EstimatorHandle {
            done: Some(done_tx),
            handle: Some(handle),
        }
    }
}

/// Handle to a running estimator thread.
pub struct EstimatorHandle {
    done: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl EstimatorHandle {
    /// Signal completion and wait for the terminal update to be published.
    pub fn finish(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(done) = self.done.take() {
            let _ = done.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("progress estimator thread panicked");
            }
        }
    }
}

impl Drop for EstimatorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
