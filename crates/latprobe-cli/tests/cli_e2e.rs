//! End-to-end runs of the `latprobe` binary.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;

/// Run the binary and return (exit code, stdout, stderr).
fn run_cli(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_latprobe"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute latprobe");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (output.status.code().unwrap_or(-1), stdout, stderr)
}

fn metrics_file(text: &str) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(text.as_bytes()).unwrap();
    f
}

#[test]
fn missing_file_exits_1() {
    let (code, stdout, stderr) = run_cli(&["definitely/not/here.prom"]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Error: File 'definitely/not/here.prom' not found."));
}

#[test]
fn hikari_snapshot_reports_one_issue() {
    let f = metrics_file("hikaricp_connections_active 18\nhikaricp_connections_max 20\n");
    let (code, stdout, _) = run_cli(&[f.path().to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("🔍 Analyzing metrics..."));
    assert!(stdout.contains("Found 1 potential issue(s):"));
    assert!(stdout.contains("Usage: 90.0%"));
    assert!(stdout.contains("Next Steps"));
}

#[test]
fn healthy_snapshot() {
    let f = metrics_file("# TYPE up gauge\nup 1\n");
    let (code, stdout, _) = run_cli(&[f.path().to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No issues detected!"));
}

#[test]
fn json_output_is_clean() {
    let f = metrics_file("thread_pool_active 95\nthread_pool_max 100\n");
    let (code, stdout, _) = run_cli(&[f.path().to_str().unwrap(), "--format", "json"]);
    assert_eq!(code, 0);
    let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(v["issues"][0]["usage"], "95.0%");
    assert_eq!(v["issues"][0]["severity"], "high");
}

#[test]
fn config_extends_rules() {
    let metrics = metrics_file("undertow_worker_busy 19\nundertow_worker_max 20\n");
    let mut cfg = NamedTempFile::new().unwrap();
    writeln!(
        cfg,
        "version: 1\nrules:\n  thread_pool:\n    - {{ busy: \"undertow_worker_busy\", max: \"undertow_worker_max\" }}"
    )
    .unwrap();

    let (code, stdout, _) = run_cli(&[
        metrics.path().to_str().unwrap(),
        "--config",
        cfg.path().to_str().unwrap(),
        "--format",
        "json",
    ]);
    assert_eq!(code, 0);
    let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(v["issues"][0]["metric"], "undertow_worker_busy/undertow_worker_max");
}

#[test]
fn bad_config_exits_1() {
    let metrics = metrics_file("up 1\n");
    let mut cfg = NamedTempFile::new().unwrap();
    writeln!(cfg, "version: 3").unwrap();

    let (code, _, stderr) = run_cli(&[
        metrics.path().to_str().unwrap(),
        "--config",
        cfg.path().to_str().unwrap(),
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unsupported config version"));
}

#[test]
fn unreadable_path_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run_cli(&[dir.path().to_str().unwrap()]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("❌ Error reading file:"), "stderr={stderr}");
    assert!(!stderr.contains("not found"));
}
