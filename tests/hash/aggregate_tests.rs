// Tests for result aggregation

use hashsweep::hash::{HashResult, ResultAggregator};
use std::path::Path;

#[test]
fn test_success_and_error_lines() {
    let mut aggregator = ResultAggregator::new();

    let ok = HashResult::success(Path::new("/data/a.bin"), "4ae71336e44bf9bf79d2752e234818a5".to_string());
    let failed = HashResult::failure(Path::new("/data/b.bin"), "No such file or directory (os error 2)".to_string());

    assert_eq!(aggregator.push(&ok), "/data/a.bin: 4ae71336e44bf9bf79d2752e234818a5\n");
    assert_eq!(
        aggregator.push(&failed),
        "Error hashing /data/b.bin: No such file or directory (os error 2)\n"
    );

    assert_eq!(
        aggregator.text_log(),
        "/data/a.bin: 4ae71336e44bf9bf79d2752e234818a5\nError hashing /data/b.bin: No such file or directory (os error 2)\n"
    );
}

#[test]
fn test_rows_only_for_successes_in_arrival_order() {
    let mut aggregator = ResultAggregator::new();
    aggregator.push(&HashResult::success(Path::new("/z/last.txt"), "11".repeat(16)));
    aggregator.push(&HashResult::failure(Path::new("/m/bad.txt"), "denied".to_string()));
    aggregator.push(&HashResult::success(Path::new("/a/first.txt"), "22".repeat(16)));

    let (log, rows) = aggregator.into_parts();
    assert_eq!(log.lines().count(), 3);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].filename, "last.txt");
    assert_eq!(rows[1].filename, "first.txt");
    assert_eq!(rows[1].path, Path::new("/a/first.txt"));
    assert_eq!(rows[1].digest, "22".repeat(16));
}

#[test]
fn test_result_exclusivity() {
    let ok = HashResult::success(Path::new("x"), "ab".to_string());
    assert_eq!(ok.digest(), Some("ab"));
    assert_eq!(ok.error(), None);

    let failed = HashResult::failure(Path::new("x"), "boom".to_string());
    assert_eq!(failed.digest(), None);
    assert_eq!(failed.error(), Some("boom"));
}
