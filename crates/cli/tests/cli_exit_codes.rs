use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn reposync(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_reposync"))
        .args(args)
        .current_dir(cwd)
        .env("HOME", cwd)
        .env("GIT_CEILING_DIRECTORIES", cwd.parent().unwrap_or(cwd))
        .env_remove("RUST_LOG")
        .output()
        .expect("reposync should run")
}

fn json_stdout(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).expect("stdout should be one JSON object")
}

#[test]
fn help_and_version_exit_zero() {
    let temp = TempDir::new().expect("tempdir should be created");

    for flag in ["--help", "--version"] {
        let output = reposync(temp.path(), &[flag]);
        assert_eq!(output.status.code(), Some(0), "{flag}");
        assert!(!output.stdout.is_empty(), "{flag} should print something");
    }
}

#[test]
fn missing_or_unknown_verb_exits_one_with_usage() {
    let temp = TempDir::new().expect("tempdir should be created");

    let missing = reposync(temp.path(), &[]);
    assert_eq!(missing.status.code(), Some(1));

    let unknown = reposync(temp.path(), &["deploy"]);
    assert_eq!(unknown.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&unknown.stderr).contains("Usage"));
}

#[test]
fn json_status_outside_repository() {
    let temp = TempDir::new().expect("tempdir should be created");

    let output = reposync(temp.path(), &["--json", "status"]);

    assert_eq!(output.status.code(), Some(1));
    let result = json_stdout(&output);
    assert_eq!(result["verb"], "status");
    assert_eq!(result["succeeded"], false);
    assert_eq!(result["failure"]["code"], "NOT_A_REPOSITORY");
    assert_eq!(result["failure"]["kind"], "environment");
}

#[test]
fn save_without_message_is_an_input_error() {
    let temp = TempDir::new().expect("tempdir should be created");

    let output = reposync(temp.path(), &["save", "--json"]);

    assert_eq!(output.status.code(), Some(1));
    let result = json_stdout(&output);
    assert_eq!(result["failure"]["code"], "MISSING_MESSAGE");
    assert_eq!(result["failure"]["kind"], "input");
}

#[test]
fn human_failure_goes_to_stderr() {
    let temp = TempDir::new().expect("tempdir should be created");

    let output = reposync(temp.path(), &["check"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}
