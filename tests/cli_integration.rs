//! CLI integration tests
//!
//! Runs the built binary against temporary solutions and checks stdout,
//! stderr and exit codes.

mod support;

use std::process::{Command, Output};
use support::{sdk_project, Workspace};

fn inspector() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_nuget-inspector"));
    for (key, _) in std::env::vars() {
        if key.starts_with("NUGET_INSPECTOR_") || key == "RUST_LOG" {
            command.env_remove(key);
        }
    }
    command
}

fn run(args: &[&str]) -> Output {
    inspector().args(args).output().expect("Failed to run nuget-inspector")
}

fn create_solution() -> Workspace {
    let mut workspace = Workspace::new();
    workspace.write("Api/Api.csproj", &sdk_project(&[("Serilog", "3.1.1")]));
    workspace.write("Api.Tests/Api.Tests.csproj", &sdk_project(&[("xunit", "2.6.2")]));
    workspace
        .member("Api", r"Api\Api.csproj", "{1}")
        .member("Api.Tests", r"Api.Tests\Api.Tests.csproj", "{2}");
    workspace.write_solution("Api");
    workspace
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("inspect"));
}

#[test]
fn test_cli_version() {
    let output = run(&["--version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_inspect_solution_prints_json() {
    let workspace = create_solution();
    let target = workspace.path("Api.sln");

    let output = run(&[
        "inspect",
        target.to_str().unwrap(),
        "--excluded-modules",
        r"\.Tests$",
    ]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results[0]["status"], "Success");
    assert_eq!(results[0]["resultName"], "Api");

    let children = results[0]["containers"][0]["children"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["name"], "Api");
    assert_eq!(children[0]["type"], "Project");
    assert_eq!(children[0]["packages"][0]["id"], "Serilog");
}

#[test]
fn test_inspect_directory_defaults_to_solutions() {
    let workspace = create_solution();

    let output = inspector()
        .current_dir(workspace.root())
        .args(["inspect", "--format", "human"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Solution Api"));
    assert!(stdout.contains("Serilog/3.1.1"));
    assert!(stdout.contains("xunit/2.6.2"));
}

#[test]
fn test_failed_inspection_exits_nonzero() {
    let workspace = Workspace::new();
    workspace.write("Bad/Bad.csproj", &sdk_project(&[]));
    workspace.write("Bad/project.json", "{");
    let target = workspace.path("Bad/Bad.csproj");

    let output = run(&["inspect", target.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results[0]["status"], "Error");

    let output = run(&["inspect", target.to_str().unwrap(), "--ignore-failure"]);
    assert!(output.status.success());
}

#[test]
fn test_missing_target_reports_error_result() {
    let workspace = Workspace::new();
    let target = workspace.path("Missing.sln");

    let output = run(&["inspect", target.to_str().unwrap(), "--ignore-failure"]);
    assert_eq!(output.status.code(), Some(1));

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results[0]["status"], "Error");
    assert!(results[0]["failure"].as_str().unwrap().contains("not found"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn test_empty_directory_exits_nonzero() {
    let workspace = Workspace::new();
    workspace.write("notes.txt", "nothing to inspect");

    let output = run(&["inspect", workspace.root().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn test_environment_supplies_filters() {
    let workspace = create_solution();
    let target = workspace.path("Api.sln");

    let output = inspector()
        .env("NUGET_INSPECTOR_INCLUDED_MODULES", "Api.Tests")
        .args(["inspect", target.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let children = results[0]["containers"][0]["children"].as_array().unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0]["name"], "Api.Tests");
}

#[test]
fn test_invalid_environment_flag_exits_nonzero() {
    let workspace = create_solution();
    let output = inspector()
        .env("NUGET_INSPECTOR_IGNORE_FAILURE", "maybe")
        .args(["inspect", workspace.path("Api.sln").to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}
