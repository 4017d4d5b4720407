//! Integration tests for version and help output.

mod common;

use common::{run_mbuild, stdout_of, TestProject};

#[test]
fn test_version_flag_prints_name_and_version() {
    let project = TestProject::new();

    let output = run_mbuild(&project, &["--version"]);

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("mbuild"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_subcommands_inherit_the_version() {
    let project = TestProject::new();

    let output = run_mbuild(&project, &["build", "--version"]);

    assert!(output.status.success());
    assert!(stdout_of(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_bare_invocation_prints_help() {
    let project = TestProject::new();

    let output = run_mbuild(&project, &[]);

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("build"));
    assert!(stdout.contains("mock"));
}

#[test]
fn test_help_lists_every_command() {
    let project = TestProject::new();

    let output = run_mbuild(&project, &["--help"]);

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    for command in ["build", "mock", "localinstall", "localbuild", "clean", "check"] {
        assert!(stdout.contains(command), "missing {command} in help output");
    }
}
