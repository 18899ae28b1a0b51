// Hashing session module
// Runs one selection end to end: expand, size, hash, aggregate, report

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use super::aggregate::{ReportRow, ResultAggregator};
use super::error::HashUtilityError;
use super::expand::Selection;
use super::hash::{FileTask, HashComputer, HashResult};
use super::pool::HashWorkerPool;
use super::progress::{ByteProgressTracker, ProgressCallback, ProgressEstimator, ProgressUpdate, DEFAULT_SAMPLE_INTERVAL};
use super::report::{ReportTargets, ReportWriter};

/// Type alias for the live result line callback
pub type LineCallback = Box<dyn Fn(&HashResult, &str) + Send + Sync>;

/// Frozen facts about one run
#[derive(Debug, Clone)]
pub struct RunState {
    pub tasks: Vec<FileTask>,
    /// Sum of task sizes at enumeration time
    pub total_size: u64,
}

impl RunState {
    /// Expand the selection and measure every file's size
    ///
    /// Fails with `EmptySelection` when nothing resolves and with
    /// `ZeroTotalSize` when all resolved files are empty or unreadable.
    pub fn prepare(selection: &Selection) -> Result<Self, HashUtilityError> {
        let files = selection.expand();
        if files.is_empty() {
            return Err(HashUtilityError::EmptySelection);
        }

        let tasks: Vec<FileTask> = files.into_iter().map(FileTask::measure).collect();
        let total_size: u64 = tasks.iter().map(|t| t.size).sum();
        if total_size == 0 {
            return Err(HashUtilityError::ZeroTotalSize { files: tasks.len() });
        }

        Ok(Self { tasks, total_size })
    }
}

/// Outcome of a completed run
#[derive(Debug, serde::Serialize)]
pub struct RunSummary {
    pub files_hashed: usize,
    pub files_failed: usize,
    pub total_size: u64,
    pub bytes_processed: u64,
    #[serde(serialize_with = "serialize_duration")]
    pub duration: Duration,
    /// Results in completion order
    pub results: Vec<HashResult>,
    #[serde(skip)]
    pub text_log: String,
    #[serde(skip)]
    pub rows: Vec<ReportRow>,
    /// Report files that could not be written
    #[serde(serialize_with = "serialize_errors")]
    pub report_errors: Vec<HashUtilityError>,
}

impl RunSummary {
    pub fn total_files(&self) -> usize {
        self.files_hashed + self.files_failed
    }
}

// Helper function to serialize Duration as seconds
fn serialize_duration<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

fn serialize_errors<S>(errors: &Vec<HashUtilityError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(errors.iter().map(|e| e.to_string()))
}

/// Engine for hashing a selection and writing its reports
pub struct HashSession {
    pool: HashWorkerPool,
    sample_interval: Duration,
    writer: ReportWriter,
    progress_callback: Option<ProgressCallback>,
    line_callback: Option<LineCallback>,
}

impl HashSession {
    /// Create a session with default settings
    pub fn new() -> Self {
        Self {
            pool: HashWorkerPool::new(),
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            writer: ReportWriter::new(),
            progress_callback: None,
            line_callback: None,
        }
    }

    /// Create a session from loaded configuration
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new()
            .with_workers(config.workers)
            .with_chunk_size(config.chunk_size)
            .with_sample_interval(config.sample_interval())
            .with_sorted_reports(config.sort_reports)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.pool = self.pool.with_workers(workers);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.pool = self.pool.with_computer(HashComputer::with_chunk_size(chunk_size));
        self
    }

    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    pub fn with_sorted_reports(mut self, sort: bool) -> Self {
        self.writer = self.writer.with_sorted_rows(sort);
        self
    }

    /// Set a callback receiving periodic progress samples
    pub fn with_progress_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    /// Set a callback receiving each result's log line as it arrives
    pub fn with_line_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&HashResult, &str) + Send + Sync + 'static,
    {
        self.line_callback = Some(Box::new(callback));
        self
    }

    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Hash a selection and write the requested reports
    pub fn run(
        &self,
        selection: &Selection,
        targets: &ReportTargets,
    ) -> Result<RunSummary, HashUtilityError> {
        let state = RunState::prepare(selection)?;
        self.run_prepared(state, targets)
    }

    /// Hash an already prepared run and write the requested reports
    pub fn run_prepared(
        &self,
        state: RunState,
        targets: &ReportTargets,
    ) -> Result<RunSummary, HashUtilityError> {
        let RunState { tasks, total_size } = state;
        let start_time = Instant::now();
        info!(
            "Hashing {} files ({} bytes) with {} workers",
            tasks.len(),
            total_size,
            self.pool.workers()
        );

        let tracker = Arc::new(ByteProgressTracker::new());
        let mut run = self.pool.run(tasks, Arc::clone(&tracker))?;

        // Progress starts only once the pool is running
        let estimator = self.progress_callback.as_ref().map(|callback| {
            ProgressEstimator::new(Arc::clone(&tracker), total_size, start_time)
                .with_interval(self.sample_interval)
                .spawn(Arc::clone(callback))
        });

        let mut aggregator = ResultAggregator::new();
        let mut results = Vec::new();
        for result in run.by_ref() {
            let line = aggregator.push(&result);
            if let Some(ref callback) = self.line_callback {
                callback(&result, &line);
            }
            results.push(result);
        }

        if let Some(estimator) = estimator {
            estimator.finish();
        }
        run.finish()?;

        let duration = start_time.elapsed();
        let files_failed = results.iter().filter(|r| !r.is_success()).count();
        debug!(
            results = results.len(),
            failed = files_failed,
            bytes = tracker.get(),
            "hash pool finished"
        );

        let (text_log, rows) = aggregator.into_parts();
        let report_errors = self.writer.write_all(targets, &text_log, &rows);

        Ok(RunSummary {
            files_hashed: results.len() - files_failed,
            files_failed,
            total_size,
            bytes_processed: tracker.get(),
            duration,
            results,
            text_log,
            rows,
            report_errors,
        })
    }
}

impl Default for HashSession {
    fn default() -> Self {
        Self::new()
    }
}
