// Hashing engine
// Selection expansion, parallel MD5 hashing, progress estimation and reports

pub mod aggregate;
pub mod error;
pub mod expand;
pub mod hash;
pub mod pool;
pub mod progress;
pub mod report;
pub mod session;

// Re-export commonly used types for convenience
pub use aggregate::{ReportRow, ResultAggregator};
pub use error::HashUtilityError;
pub use expand::{expand, ExtensionFilter, Selection, SelectionMode};
pub use hash::{FileTask, HashComputer, HashOutcome, HashResult, DEFAULT_CHUNK_SIZE};
pub use pool::{default_workers, HashWorkerPool, PoolRun};
pub use progress::{ByteProgressTracker, Eta, ProgressEstimator, ProgressUpdate, DEFAULT_SAMPLE_INTERVAL};
pub use report::{ReportTargets, ReportWriter, CSV_HEADER};
pub use session::{HashSession, RunState, RunSummary};
