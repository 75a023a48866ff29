// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;

pub const SAMPLE_LOG: &str = "2023-10-28 12:00:01 - INFO - User logged in
2023-10-28 12:00:03 - ERROR - Database connection failed
2023-10-28 12:00:04 - DEBUG - Cache hit for request
2023-10-28 12:00:05 - INFO - User logged out
2023-10-28 12:00:07 - ERROR - Timeout reached while processing
2023-10-28 12:00:08 - INFO - User logged in
";

/// Build a command for the kwtally binary. User config files are ignored
/// unless the test points at one explicitly.
fn kwtally_command(args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kwtally"));
    if !args.iter().any(|a| a.starts_with("--config-file")) {
        cmd.arg("--ignore-config");
    }
    cmd.args(args).env_remove("RUST_LOG").env("NO_COLOR", "1");
    cmd
}

/// Helper function to run kwtally with given arguments and input via stdin
pub fn run_kwtally_with_input(args: &[&str], input: &str) -> (String, String, i32) {
    let mut cmd = kwtally_command(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start kwtally");

    // Write input to stdin
    if let Some(stdin) = cmd.stdin.as_mut() {
        stdin
            .write_all(input.as_bytes())
            .expect("Failed to write to stdin");
    }

    let output = cmd.wait_with_output().expect("Failed to read output");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Helper function to run kwtally with a temporary file
pub fn run_kwtally_with_file(args: &[&str], file_content: &str) -> (String, String, i32) {
    run_kwtally_with_bytes(args, file_content.as_bytes())
}

/// Helper function to run kwtally with a temporary file holding raw bytes
pub fn run_kwtally_with_bytes(args: &[&str], file_content: &[u8]) -> (String, String, i32) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file
        .write_all(file_content)
        .expect("Failed to write to temp file");
    temp_file.flush().expect("Failed to flush temp file");

    let mut full_args = args.to_vec();
    full_args.push(temp_file.path().to_str().unwrap());
    run_kwtally(&full_args)
}

/// Helper function to run kwtally with arguments only
pub fn run_kwtally(args: &[&str]) -> (String, String, i32) {
    let output = kwtally_command(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute kwtally");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Pull the total line count out of `--stats` output
pub fn extract_lines_processed_from_stats(stderr: &str) -> usize {
    stderr
        .lines()
        .find_map(|line| line.strip_prefix("Lines processed: "))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

/// Helper function to run kwtally with raw bytes piped to stdin
pub fn run_kwtally_with_stdin_bytes(args: &[&str], input: &[u8]) -> (String, String, i32) {
    let mut child = kwtally_command(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start kwtally");

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input).expect("Failed to write to stdin");
    }

    let output = child.wait_with_output().expect("Failed to read output");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}
