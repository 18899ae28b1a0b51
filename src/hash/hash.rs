// Hash computation module
// Streams files through MD5 while crediting bytes to the shared tracker

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use md5::{Digest, Md5};
use super::error::HashUtilityError;
use super::progress::ByteProgressTracker;

/// Default read size per chunk (128 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 128 * 1024;

/// A file awaiting hashing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub path: PathBuf,
    /// On-disk size measured at enumeration time, 0 if it could not be read
    pub size: u64,
}

impl FileTask {
    /// Create a task, probing the file size now
    pub fn measure(path: PathBuf) -> Self {
        let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        Self { path, size }
    }
}

/// Digest or error for one file; never both
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HashOutcome {
    Digest(String),
    Error(String),
}

/// Result of hashing one file
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct HashResult {
    pub filename: String,
    pub full_path: PathBuf,
    pub outcome: HashOutcome,
}

impl HashResult {
    pub fn success(path: &Path, digest: String) -> Self {
        Self {
            filename: file_name(path),
            full_path: path.to_path_buf(),
            outcome: HashOutcome::Digest(digest),
        }
    }

    pub fn failure(path: &Path, error: String) -> Self {
        Self {
            filename: file_name(path),
            full_path: path.to_path_buf(),
            outcome: HashOutcome::Error(error),
        }
    }

    pub fn digest(&self) -> Option<&str> {
        match &self.outcome {
            HashOutcome::Digest(d) => Some(d),
            HashOutcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            HashOutcome::Digest(_) => None,
            HashOutcome::Error(e) => Some(e),
        }
    }

    pub fn is_success(&self) -> bool {
        self.digest().is_some()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// MD5 computer with streaming I/O
#[derive(Debug, Clone, Copy)]
pub struct HashComputer {
    chunk_size: usize,
}

impl HashComputer {
    /// Create a new HashComputer with the default 128 KiB chunk size
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Create a new HashComputer with a custom chunk size
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Compute the MD5 of in-memory data
    pub fn compute_hash_bytes(&self, data: &[u8]) -> String {
        bytes_to_hex(&Md5::digest(data))
    }

    /// Compute the MD5 of a file without progress accounting
    pub fn compute_hash(&self, path: &Path) -> Result<String, HashUtilityError> {
        self.stream_file(path, |_| {}).map_err(|e| {
            HashUtilityError::from_io_error(e, "reading", Some(path.to_path_buf()))
        })
    }

    /// Hash one task, crediting the tracker as chunks are read
    ///
    /// On failure the task is credited with whatever part of its
    /// enumeration-time size was not already credited, so a finished run
    /// always ends with the tracker at the run's total size.
    pub fn hash_task(&self, task: &FileTask, tracker: &ByteProgressTracker) -> HashResult {
        let mut credited = 0u64;
        let outcome = self.stream_file(&task.path, |n| {
            tracker.add(n);
            credited += n;
        });

        match outcome {
            Ok(digest) => HashResult::success(&task.path, digest),
            Err(e) => {
                tracker.add(task.size.saturating_sub(credited));
                tracing::warn!("Failed to hash {}: {}", task.path.display(), e);
                HashResult::failure(&task.path, e.to_string())
            }
        }
    }

    /// Read a file chunk by chunk into MD5, reporting each chunk's length
    fn stream_file(&self, path: &Path, mut on_chunk: impl FnMut(u64)) -> io::Result<String> {
        let mut file = File::open(path)?;
        let mut hasher = Md5::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let bytes_read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..bytes_read]);
            on_chunk(bytes_read as u64);
        }

        Ok(bytes_to_hex(&hasher.finalize()))
    }
}

impl Default for HashComputer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert bytes to hexadecimal string
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

// Tests live in tests/hash/hash_tests.rs
