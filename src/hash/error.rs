// Centralized error handling module
// Error types for selection, hashing, reporting and configuration

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Main error type for hashing runs
/// Provides context-rich error messages with file paths and operations
#[derive(Debug)]
pub enum HashUtilityError {
    /// File system errors with context
    FileNotFound { path: PathBuf },
    PermissionDenied { path: PathBuf, operation: String },
    IoError { path: Option<PathBuf>, operation: String, source: io::Error },

    /// Pre-run validation errors
    EmptySelection,
    ZeroTotalSize { files: usize },

    /// Workers stopped before every task reported a result
    IncompleteRun { expected: usize, received: usize },

    /// Report errors
    ReportWriteError { path: PathBuf, reason: String },

    /// Configuration errors
    ConfigError { path: PathBuf, reason: String },

    /// CLI errors
    InvalidArguments { message: String },
}

impl fmt::Display for HashUtilityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            // File system errors
            HashUtilityError::FileNotFound { path } => {
                write!(f, "File not found: {}\n", path.display())?;
                write!(f, "Suggestion: Check that the file path is correct and the file exists")
            }
            HashUtilityError::PermissionDenied { path, operation } => {
                write!(f, "Permission denied while {} file: {}\n", operation, path.display())?;
                write!(f, "Suggestion: Check file permissions or run with appropriate privileges")
            }
            HashUtilityError::IoError { path, operation, source } => {
                if let Some(p) = path {
                    write!(f, "I/O error while {} file {}: {}\n", operation, p.display(), source)?;
                } else {
                    write!(f, "I/O error while {}: {}\n", operation, source)?;
                }
                write!(f, "Suggestion: Check file permissions and disk space")
            }

            // Validation errors
            HashUtilityError::EmptySelection => {
                write!(f, "No files found to hash.\n")?;
                write!(f, "Suggestion: Select files, or folders that contain files matching the extension filter")
            }
            HashUtilityError::ZeroTotalSize { files } => {
                write!(f, "All files are empty or inaccessible ({} selected).\n", files)?;
                write!(f, "Suggestion: Check that the selected files exist and are not empty")
            }

            HashUtilityError::IncompleteRun { expected, received } => {
                write!(f, "Hash workers stopped after {} of {} files.\n", received, expected)?;
                write!(f, "Suggestion: Rerun with -vv and check the log for a worker failure")
            }

            // Report errors
            HashUtilityError::ReportWriteError { path, reason } => {
                write!(f, "Failed to write report {}: {}\n", path.display(), reason)?;
                write!(f, "Suggestion: Check disk space and write permissions")
            }

            // Configuration errors
            HashUtilityError::ConfigError { path, reason } => {
                write!(f, "Invalid configuration in {}: {}\n", path.display(), reason)?;
                write!(f, "Suggestion: Fix or remove the configuration file to use defaults")
            }

            // CLI errors
            HashUtilityError::InvalidArguments { message } => {
                write!(f, "Invalid arguments: {}\n", message)?;
                write!(f, "Suggestion: Run with --help to see usage information")
            }
        }
    }
}

impl std::error::Error for HashUtilityError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HashUtilityError::IoError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl HashUtilityError {
    /// Create an error from io::Error with context about the operation and optional path
    pub fn from_io_error(err: io::Error, operation: &str, path: Option<PathBuf>) -> Self {
        match (err.kind(), path) {
            (io::ErrorKind::NotFound, Some(p)) => HashUtilityError::FileNotFound { path: p },
            (io::ErrorKind::PermissionDenied, Some(p)) => HashUtilityError::PermissionDenied {
                path: p,
                operation: operation.to_string(),
            },
            (_, path) => HashUtilityError::IoError {
                path,
                operation: operation.to_string(),
                source: err,
            },
        }
    }

    /// True for the pre-run conditions that stop a run without failing the process
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            HashUtilityError::EmptySelection | HashUtilityError::ZeroTotalSize { .. }
        )
    }
}
