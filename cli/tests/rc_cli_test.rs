//! Runs the `rc` binary against a throwaway data directory

use std::process::{Command, Output};
use tempfile::TempDir;

fn rc(data_dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rc"))
        .arg("--data-dir")
        .arg(data_dir.path().join("db"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to run rc")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_markets_on_fresh_directory() {
    let dir = TempDir::new().unwrap();
    let output = rc(&dir, &["markets"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("disk_storage"));
    assert!(text.contains("\"pending\""));
}

#[test]
fn test_charge_then_settle_pending() {
    let dir = TempDir::new().unwrap();

    let output = rc(&dir, &["charge", "alice", "disk", "39600", "--balance", "10000000000"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("\"cost\": 1000000000"));

    let output = rc(&dir, &["pending"]);
    assert!(stdout(&output).contains("\"disk_storage\": 39600"));

    let output = rc(&dir, &["settle", "--pending"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = rc(&dir, &["pending"]);
    assert!(stdout(&output).contains("\"disk_storage\": 0"));
}

#[test]
fn test_settle_over_limit_fails() {
    let dir = TempDir::new().unwrap();
    let output = rc(&dir, &["settle", "--network", "1048577"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("network_bandwidth"));
}

#[test]
fn test_set_market() {
    let dir = TempDir::new().unwrap();
    let output = rc(&dir, &["set-market", "compute", "--budget", "10", "--limit", "20"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let output = rc(&dir, &["markets"]);
    assert!(stdout(&output).contains("\"block_limit\": 20"));

    let output = rc(&dir, &["set-market", "compute", "--budget", "30", "--limit", "20"]);
    assert!(!output.status.success());

    // Both a small and an empty budget still settle
    for budget in ["10", "0"] {
        let output = rc(&dir, &["set-market", "compute", "--budget", budget, "--limit", "20"]);
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

        let output = rc(&dir, &["settle"]);
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        assert!(stdout(&output).contains("Settled markets"));
    }
}
