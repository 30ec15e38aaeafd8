//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run with HOME pointed at a scratch
//! directory, so every test starts without a schedule or config.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "sleepwatch-cli", "--"])
        .args(args)
        .env("HOME", home)
        .env("SLEEPWATCH_ENV", "dev")
        .env_remove("RUST_LOG")
        .env_remove("SLEEPWATCH_DEBUG_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_cli_success(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "CLI command {args:?} failed: {stderr}");
    stdout
}

fn set_night_owl(home: &Path) -> serde_json::Value {
    let stdout = run_cli_success(
        home,
        &[
            "schedule", "set", "--name", "Ada", "--sleep", "22:30", "--wake", "08:00",
        ],
    );
    serde_json::from_str(&stdout).expect("schedule set prints JSON")
}

#[test]
fn test_status_without_schedule_fails() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["status"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no sleep schedule configured; run `schedule set`"));
}

#[test]
fn test_schedule_set_and_show() {
    let home = tempfile::tempdir().unwrap();
    let saved = set_night_owl(home.path());
    assert_eq!(saved["name"], "Ada");
    assert_eq!(saved["sleepDuration"], 9.5);
    assert_eq!(saved["sleepDisplay"], "10:30 PM");
    assert_eq!(saved["wakeDisplay"], "08:00 AM");

    let stdout = run_cli_success(home.path(), &["schedule", "show"]);
    let shown: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(shown["sleepTime"], saved["sleepTime"]);
    assert_eq!(shown["wakeTime"], saved["wakeTime"]);
}

#[test]
fn test_schedule_too_short_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        home.path(),
        &["schedule", "set", "--name", "Ada", "--sleep", "01:00", "--wake", "06:00"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));

    let (_, _, code) = run_cli(home.path(), &["schedule", "show"]);
    assert_ne!(code, 0);
}

#[test]
fn test_long_schedule_needs_force() {
    let home = tempfile::tempdir().unwrap();
    let args = [
        "schedule", "set", "--name", "Ada", "--sleep", "20:00", "--wake", "10:00",
    ];
    let (_, stderr, code) = run_cli(home.path(), &args);
    assert_ne!(code, 0);
    assert!(stderr.contains("--force"));

    let mut forced = args.to_vec();
    forced.push("--force");
    run_cli_success(home.path(), &forced);
}

#[test]
fn test_schedule_bad_clock_time() {
    let home = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(
        home.path(),
        &["schedule", "set", "--name", "Ada", "--sleep", "25:00", "--wake", "08:00"],
    );
    assert_ne!(code, 0);
    assert!(stderr.contains("25:00"));
}

#[test]
fn test_schedule_clear() {
    let home = tempfile::tempdir().unwrap();
    set_night_owl(home.path());
    run_cli_success(home.path(), &["schedule", "clear"]);
    let (_, stderr, code) = run_cli(home.path(), &["schedule", "show"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no sleep schedule configured"));
}

#[test]
fn test_status_prints_snapshot() {
    let home = tempfile::tempdir().unwrap();
    set_night_owl(home.path());

    let stdout = run_cli_success(home.path(), &["status"]);
    let snapshot: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(snapshot["type"], "state_snapshot");
    assert_eq!(snapshot["lifecycle"], "active");
    assert!(snapshot["is_sleep_period"].is_boolean());
    assert!(snapshot["message"].is_string());
}

#[test]
fn test_monitor_exits_on_end_of_input() {
    let home = tempfile::tempdir().unwrap();
    set_night_owl(home.path());

    let stdout = run_cli_success(home.path(), &["monitor"]);
    let first = stdout.lines().next().expect("monitor prints events");
    let event: serde_json::Value = serde_json::from_str(first).unwrap();
    assert_eq!(event["type"], "monitor_started");
    assert_eq!(event["sleep_minutes"], 22 * 60 + 30);
}

#[test]
fn test_config_get_set_reset() {
    let home = tempfile::tempdir().unwrap();
    let value = run_cli_success(home.path(), &["config", "get", "monitor.check_interval_secs"]);
    assert_eq!(value.trim(), "30");

    run_cli_success(home.path(), &["config", "set", "notifications.enabled", "false"]);
    let value = run_cli_success(home.path(), &["config", "get", "notifications.enabled"]);
    assert_eq!(value.trim(), "false");

    run_cli_success(home.path(), &["config", "reset"]);
    let value = run_cli_success(home.path(), &["config", "get", "notifications.enabled"]);
    assert_eq!(value.trim(), "true");
}

#[test]
fn test_config_list_and_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let stdout = run_cli_success(home.path(), &["config", "list"]);
    let config: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(config["schedule"]["min_sleep_hours"], 8.0);

    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "monitor.nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown config key: monitor.nope"));
}
