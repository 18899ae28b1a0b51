// Tests for the command line front end, run with stdout piped

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

const MD5_16_ZEROS: &str = "4ae71336e44bf9bf79d2752e234818a5";

fn hashsweep(dir: &TempDir, args: &[&str]) -> Output {
    let config = dir.path().join("config.toml");
    fs::write(&config, "workers = 2\n").unwrap();
    Command::new(env!("CARGO_BIN_EXE_hashsweep"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_result_lines_reach_piped_stdout() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.bin");
    let b = dir.path().join("missing.bin");
    fs::write(&a, [0u8; 16]).unwrap();

    let output = hashsweep(&dir, &[a.to_str().unwrap(), b.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains(&format!("{}: {}", a.display(), MD5_16_ZEROS)), "stdout: {}", stdout);
    assert!(stdout.contains(&format!("Error hashing {}: ", b.display())), "stdout: {}", stdout);
    assert!(stdout.contains("Files hashed: 1"));
}

#[test]
fn test_quiet_hides_result_lines() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.bin");
    fs::write(&a, [0u8; 16]).unwrap();

    let output = hashsweep(&dir, &["--quiet", a.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(!stdout.contains(MD5_16_ZEROS), "stdout: {}", stdout);
    assert!(stdout.contains("Files hashed: 1"));
}

#[test]
fn test_redirected_log_has_no_escape_codes() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("gone.bin");
    let present = dir.path().join("here.bin");
    fs::write(&present, b"data").unwrap();

    let output = hashsweep(&dir, &[present.to_str().unwrap(), missing.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(stderr.contains("WARN"), "stderr: {}", stderr);
    assert!(!stderr.contains('\u{1b}'), "stderr: {:?}", stderr);
}
