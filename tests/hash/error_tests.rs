// Tests for error module

use hashsweep::hash::HashUtilityError;
use std::error::Error;
use std::io;
use std::path::PathBuf;

#[test]
fn test_file_not_found_error_display() {
    let error = HashUtilityError::FileNotFound {
        path: PathBuf::from("/path/to/file.txt"),
    };
    let message = format!("{}", error);
    assert!(message.contains("File not found"));
    assert!(message.contains("/path/to/file.txt"));
    assert!(message.contains("Suggestion"));
}

#[test]
fn test_validation_errors_are_informational() {
    let empty = HashUtilityError::EmptySelection;
    assert!(empty.is_informational());
    assert!(empty.to_string().starts_with("No files found to hash."));

    let zero = HashUtilityError::ZeroTotalSize { files: 3 };
    assert!(zero.is_informational());
    assert!(zero.to_string().starts_with("All files are empty or inaccessible"));

    let report = HashUtilityError::ReportWriteError {
        path: PathBuf::from("out.csv"),
        reason: "disk full".to_string(),
    };
    assert!(!report.is_informational());
    assert!(report.to_string().contains("out.csv"));
    assert!(report.to_string().contains("disk full"));
}

#[test]
fn test_from_io_error_not_found() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
    let error = HashUtilityError::from_io_error(io_err, "reading", Some(PathBuf::from("a.bin")));
    assert!(matches!(error, HashUtilityError::FileNotFound { .. }));

    let message = error.to_string();
    assert!(message.starts_with("File not found: a.bin\n"));
}

#[test]
fn test_from_io_error_permission_denied() {
    let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
    let error = HashUtilityError::from_io_error(io_err, "reading", Some(PathBuf::from("/root/secret")));
    match error {
        HashUtilityError::PermissionDenied { path, operation } => {
            assert_eq!(path, PathBuf::from("/root/secret"));
            assert_eq!(operation, "reading");
        }
        other => panic!("expected PermissionDenied, got {:?}", other),
    }
}

#[test]
fn test_io_error_keeps_source() {
    let io_err = io::Error::new(io::ErrorKind::Other, "disk full");
    let error = HashUtilityError::from_io_error(io_err, "writing", Some(PathBuf::from("out.txt")));
    let message = format!("{}", error);
    assert!(message.contains("I/O error"));
    assert!(message.contains("out.txt"));
    assert!(error.source().is_some());
}

#[test]
fn test_from_io_error_without_path() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
    let error = HashUtilityError::from_io_error(io_err, "starting hash coordinator", None);
    assert!(matches!(error, HashUtilityError::IoError { path: None, .. }));
    assert!(error.to_string().starts_with("I/O error while starting hash coordinator: gone\n"));
}

#[test]
fn test_incomplete_run_message() {
    let error = HashUtilityError::IncompleteRun { expected: 5, received: 3 };
    assert!(error.to_string().starts_with("Hash workers stopped after 3 of 5 files.\n"));
    assert!(!error.is_informational());
}
