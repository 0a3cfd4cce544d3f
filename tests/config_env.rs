//! Environment-sourced options
//!
//! These tests mutate process environment variables and run serially.

use nuget_inspector::config::{ConfigError, DEFAULT_PACKAGES_REPO_URL};
use nuget_inspector::{InspectionOptions, SolutionOptions};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

const VARIABLES: &[&str] = &[
    "NUGET_INSPECTOR_OUTPUT_DIRECTORY",
    "NUGET_INSPECTOR_INCLUDED_MODULES",
    "NUGET_INSPECTOR_EXCLUDED_MODULES",
    "NUGET_INSPECTOR_IGNORE_FAILURE",
    "NUGET_INSPECTOR_VERBOSE",
    "NUGET_INSPECTOR_PACKAGES_REPO_URL",
];

fn clear() {
    for variable in VARIABLES {
        env::remove_var(variable);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear();
    let raw = InspectionOptions::from_env().unwrap();
    assert_eq!(raw, InspectionOptions::default());

    let options = SolutionOptions::resolve(&InspectionOptions {
        target_path: Some(PathBuf::from("/src/App.sln")),
        ..raw
    })
    .unwrap();
    assert_eq!(options.solution_name, "App");
    assert!(!options.shared.modules.is_configured());
}

#[test]
#[serial]
fn test_environment_values() {
    clear();
    env::set_var("NUGET_INSPECTOR_OUTPUT_DIRECTORY", "/tmp/inspection");
    env::set_var("NUGET_INSPECTOR_EXCLUDED_MODULES", "Tests, Benchmarks");
    env::set_var("NUGET_INSPECTOR_IGNORE_FAILURE", "TRUE");
    env::set_var("NUGET_INSPECTOR_VERBOSE", "false");
    env::set_var("NUGET_INSPECTOR_PACKAGES_REPO_URL", "   ");

    let raw = InspectionOptions::from_env().unwrap();
    clear();

    assert_eq!(raw.output_directory, Some(PathBuf::from("/tmp/inspection")));
    assert_eq!(raw.excluded_modules.as_deref(), Some("Tests, Benchmarks"));
    assert!(raw.ignore_failure);
    assert!(!raw.verbose);
    assert_eq!(raw.packages_repo_url, None);
    assert_eq!(raw.repository_url(), DEFAULT_PACKAGES_REPO_URL);
}

#[test]
#[serial]
fn test_invalid_flag_is_parse_error() {
    clear();
    env::set_var("NUGET_INSPECTOR_VERBOSE", "sometimes");

    let err = InspectionOptions::from_env().unwrap_err();
    clear();

    match err {
        ConfigError::ParseError { field, .. } => assert_eq!(field, "NUGET_INSPECTOR_VERBOSE"),
        other => panic!("unexpected error {:?}", other),
    }
}
