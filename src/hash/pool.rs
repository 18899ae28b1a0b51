// Worker pool module
// Hashes tasks on a fixed-size rayon pool and streams results in completion order

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use crossbeam_channel::{unbounded, Receiver};
use rayon::prelude::*;
use tracing::{debug, error};
use super::error::HashUtilityError;
use super::hash::{FileTask, HashComputer, HashResult};
use super::progress::ByteProgressTracker;

/// Default worker count: the number of available processing units
pub fn default_workers() -> usize {
    num_cpus::get().max(1)
}

/// Fixed-size pool that hashes every submitted task exactly once
pub struct HashWorkerPool {
    workers: usize,
    computer: HashComputer,
}

impl HashWorkerPool {
    /// Create a pool sized to the host's CPU parallelism
    pub fn new() -> Self {
        Self {
            workers: default_workers(),
            computer: HashComputer::new(),
        }
    }

    /// Set the number of worker threads (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the hash computer used by every worker
    pub fn with_computer(mut self, computer: HashComputer) -> Self {
        self.computer = computer;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Hash all tasks in the background
    ///
    /// Returns a [`PoolRun`] yielding one [`HashResult`] per task, in the
    /// order the tasks finish. A failed task never stops its siblings.
    pub fn run(
        &self,
        tasks: Vec<FileTask>,
        tracker: Arc<ByteProgressTracker>,
    ) -> Result<PoolRun, HashUtilityError> {
        let computer = self.computer;
        self.run_with(tasks, move |task| computer.hash_task(task, &tracker))
    }

    /// Run `job` once per task on the pool's workers
    pub fn run_with<F>(&self, tasks: Vec<FileTask>, job: F) -> Result<PoolRun, HashUtilityError>
    where
        F: Fn(&FileTask) -> HashResult + Send + Sync + 'static,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("hash-worker-{}", i))
            .build()
            .map_err(|e| HashUtilityError::IoError {
                path: None,
                operation: "starting hash workers".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
            })?;

        let (sender, receiver) = unbounded::<HashResult>();
        let expected = tasks.len();
        let workers = self.workers;

        // The coordinator owns the pool; the channel closes when it returns
        let coordinator = thread::Builder::new()
            .name("hash-coordinator".to_string())
            .spawn(move || {
                debug!(tasks = tasks.len(), workers, "hash pool started");
                pool.install(|| {
                    tasks.par_iter().for_each_with(sender, |sender, task| {
                        if sender.send(job(task)).is_err() {
                            error!("result receiver dropped before {} was reported", task.path.display());
                        }
                    });
                });
                debug!("hash pool drained");
            })
            .map_err(|e| HashUtilityError::from_io_error(e, "starting hash coordinator", None))?;

        Ok(PoolRun {
            receiver,
            coordinator,
            expected,
            received: 0,
        })
    }

    /// Hash all tasks and collect the results in completion order
    pub fn run_to_completion(
        &self,
        tasks: Vec<FileTask>,
        tracker: Arc<ByteProgressTracker>,
    ) -> Result<Vec<HashResult>, HashUtilityError> {
        let mut run = self.run(tasks, tracker)?;
        let results: Vec<HashResult> = run.by_ref().collect();
        run.finish()?;
        Ok(results)
    }
}

/// A started pool run: iterate it for results, then call [`PoolRun::finish`]
pub struct PoolRun {
    receiver: Receiver<HashResult>,
    coordinator: JoinHandle<()>,
    expected: usize,
    received: usize,
}

impl PoolRun {
    /// Number of tasks submitted
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Number of results yielded so far
    pub fn received(&self) -> usize {
        self.received
    }

    /// Join the coordinator and check that every task reported
    ///
    /// A worker panic closes the stream early; it surfaces here as
    /// `IncompleteRun` rather than as a short result list.
    pub fn finish(self) -> Result<(), HashUtilityError> {
        let PoolRun { receiver, coordinator, expected, received } = self;
        drop(receiver);

        if coordinator.join().is_err() {
            error!(expected, received, "hash coordinator panicked");
        }
        if received != expected {
            return Err(HashUtilityError::IncompleteRun { expected, received });
        }
        Ok(())
    }
}

impl Iterator for PoolRun {
    type Item = HashResult;

    fn next(&mut self) -> Option<HashResult> {
        let result = self.receiver.recv().ok()?;
        self.received += 1;
        Some(result)
    }
}

impl Default for HashWorkerPool {
    fn default() -> Self {
        Self::new()
    }
}
