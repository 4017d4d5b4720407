//! Integration tests for the `localinstall` command.

#![cfg(unix)]

mod common;

use common::{run_mbuild, stderr_of, stdout_of, TestProject, HAPPY_RPM};

const REFUSING_RPM: &str = r#"#!/bin/sh
echo 'Verifying packages...'
echo 'error: unpacking of archive failed' >&2
exit 1
"#;

// ============================================================================
// Happy path
// ============================================================================

#[test]
fn test_localinstall_unpacks_into_the_workdir() {
    let project = TestProject::new();
    project.install_tool("rpm", HAPPY_RPM);
    project.seed_srpm("alpha-1.0-1.src.rpm");

    let output = run_mbuild(&project, &["localinstall", "-s", "alpha-1.0-1.src.rpm"]);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("1 of 1 builds succeeded"));
    assert!(project.file_exists("SPECS/alpha.spec"));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_failed_install_leaves_an_error_log() {
    let project = TestProject::new();
    project.install_tool("rpm", REFUSING_RPM);
    project.seed_srpm("alpha-1.0-1.src.rpm");

    let output = run_mbuild(&project, &["localinstall", "-s", "alpha-1.0-1.src.rpm"]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("alpha-1.0-1 failed at materialize"));
    let log = project.read_artifact("", "mbuild_srpminstall_err.log_");
    assert_eq!(
        log,
        "Verifying packages...\nerror: unpacking of archive failed\n"
    );
}

#[test]
fn test_localinstall_rejects_a_missing_source() {
    let project = TestProject::new();
    project.install_tool("rpm", HAPPY_RPM);

    let output = run_mbuild(&project, &["localinstall", "-s", "ghost-1.0-1.src.rpm"]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("is not a valid srpm file"));
}
