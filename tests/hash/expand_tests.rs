// Tests for selection expansion

use hashsweep::hash::{expand, ExtensionFilter, Selection, SelectionMode};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn names(files: &[PathBuf], root: &Path) -> BTreeSet<String> {
    files
        .iter()
        .map(|p| {
            p.strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

fn log_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("x.log"), b"top log").unwrap();
    fs::write(dir.path().join("x.txt"), b"top text").unwrap();
    fs::write(dir.path().join("sub/y.log"), b"nested log").unwrap();
    dir
}

#[test]
fn test_files_mode_returns_paths_unchanged() {
    let paths = vec![PathBuf::from("b.bin"), PathBuf::from("missing/a.bin"), PathBuf::from("b.bin")];
    let files = expand(&paths, SelectionMode::Files, true, None);
    assert_eq!(files, paths);
}

#[test]
fn test_recursive_log_filter() {
    let dir = log_tree();
    let filter = ExtensionFilter::parse(".log");
    let files = Selection::folders([dir.path()])
        .with_recurse(true)
        .with_filter(filter)
        .expand();

    let expected: BTreeSet<String> = ["x.log", "sub/y.log"].iter().map(|s| s.to_string()).collect();
    assert_eq!(names(&files, dir.path()), expected);
}

#[test]
fn test_non_recursive_excludes_subfolders() {
    let dir = log_tree();
    let files = Selection::folders([dir.path()])
        .with_filter(ExtensionFilter::parse(".log"))
        .expand();

    assert_eq!(files, vec![dir.path().join("x.log")]);
}

#[test]
fn test_non_recursive_skips_directories() {
    let dir = log_tree();
    let files = Selection::folders([dir.path()]).expand();
    let expected: BTreeSet<String> = ["x.log", "x.txt"].iter().map(|s| s.to_string()).collect();
    assert_eq!(names(&files, dir.path()), expected);
}

#[test]
fn test_recursive_without_filter_finds_everything() {
    let dir = log_tree();
    fs::create_dir_all(dir.path().join("sub/deeper/deepest")).unwrap();
    fs::write(dir.path().join("sub/deeper/deepest/z.bin"), b"z").unwrap();

    let files = Selection::folders([dir.path()]).with_recurse(true).expand();
    assert_eq!(files.len(), 4);
    assert!(files.iter().all(|p| p.is_file()));
}

#[test]
fn test_extension_filter_is_case_insensitive() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("report.txt"), b"r").unwrap();
    fs::write(dir.path().join("NOTES.Txt"), b"n").unwrap();
    fs::write(dir.path().join("image.png"), b"i").unwrap();

    let files = Selection::folders([dir.path()])
        .with_filter(ExtensionFilter::parse(".TXT"))
        .expand();
    let expected: BTreeSet<String> = ["report.txt", "NOTES.Txt"].iter().map(|s| s.to_string()).collect();
    assert_eq!(names(&files, dir.path()), expected);
}

#[test]
fn test_filter_parse() {
    let filter = ExtensionFilter::parse(" .TXT, py ,, .Md ").unwrap();
    let exts: Vec<&str> = filter.extensions().collect();
    assert_eq!(exts, vec![".md", ".py", ".txt"]);

    assert!(filter.matches(Path::new("script.PY")));
    assert!(!filter.matches(Path::new("archive.tar.gz")));
    assert!(!filter.matches(Path::new(".txt")));
    assert!(!filter.matches(Path::new("README")));
}

#[test]
fn test_filter_parse_blank_is_none() {
    assert!(ExtensionFilter::parse("").is_none());
    assert!(ExtensionFilter::parse(" , ,").is_none());
}

#[test]
fn test_missing_folder_contributes_nothing() {
    let dir = log_tree();
    let missing = dir.path().join("does_not_exist");

    for recurse in [false, true] {
        let files = Selection::folders([missing.clone(), dir.path().to_path_buf()])
            .with_recurse(recurse)
            .with_filter(ExtensionFilter::parse(".txt"))
            .expand();
        assert_eq!(files, vec![dir.path().join("x.txt")]);
    }
}

#[test]
fn test_file_given_as_folder_contributes_nothing() {
    let dir = log_tree();
    let file = dir.path().join("x.log");

    let flat = Selection::folders(vec![file.clone()]).expand();
    let deep = Selection::folders(vec![file]).with_recurse(true).expand();

    assert!(flat.is_empty(), "listing a file found {:?}", flat);
    assert!(deep.is_empty(), "walking a file found {:?}", deep);
}

#[test]
fn test_overlapping_folders_are_not_deduplicated() {
    let dir = log_tree();
    let files = Selection::folders([dir.path().to_path_buf(), dir.path().join("sub")])
        .with_recurse(true)
        .with_filter(ExtensionFilter::parse(".log"))
        .expand();

    let nested = dir.path().join("sub").join("y.log");
    assert_eq!(files.len(), 3);
    assert_eq!(files.iter().filter(|p| **p == nested).count(), 2);
}

#[test]
fn test_expansion_is_repeatable() {
    let dir = log_tree();
    let selection = Selection::folders([dir.path()]).with_recurse(true);

    let first: BTreeSet<PathBuf> = selection.expand().into_iter().collect();
    let second: BTreeSet<PathBuf> = selection.expand().into_iter().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
}
