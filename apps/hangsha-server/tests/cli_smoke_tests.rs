#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the hangsha-server binary.

use std::io::Write;
use std::process::{Command, Stdio};

fn run_hangsha_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_hangsha-server"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute hangsha-server")
}

#[test]
fn test_cli_help_command() {
    let output = run_hangsha_server(&["--help"]);
    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_hangsha_server(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("hangsha-server"));
}

#[test]
fn test_missing_config_file_fails() {
    let output = run_hangsha_server(&["--config", "/definitely/not/here.yaml", "check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("config file does not exist"));
}

#[test]
fn test_check_reports_effective_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "server:\n  port: 9123\nlogging:\n  format: json").unwrap();
    let path = file.path().to_str().unwrap().to_owned();

    let output = run_hangsha_server(&["--config", &path, "check"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration is valid"));
    assert!(stdout.contains("9123"));
}

#[test]
fn test_print_config_applies_cli_overrides() {
    let output = run_hangsha_server(&["--print-config", "--port", "7001", "--mock"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("7001"));
    assert!(stdout.contains("sqlite::memory:"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "server:\n  port: not-a-port").unwrap();
    let path = file.path().to_str().unwrap().to_owned();

    let output = run_hangsha_server(&["--config", &path, "check"]);
    assert!(!output.status.success());
}
