//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests. Every
//! test directory carries a bin/ subdirectory of stand-in build tools
//! which the driver finds through a prepended PATH, so no test ever
//! touches rpm, yum, rpmbuild or mock on the host.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test working directory with stand-in tools
pub struct TestProject {
    /// Temporary directory the test operates in
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test directory with an empty bin/
    pub fn new() -> Self {
        let project = Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        };
        std::fs::create_dir(project.path().join("bin")).expect("Failed to create bin directory");
        project
    }

    /// Get the path to the test directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test directory
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test directory
    pub fn create_dir(&self, name: &str) {
        std::fs::create_dir_all(self.path().join(name)).expect("Failed to create directory");
    }

    /// Check if a file exists in the test directory
    pub fn file_exists(&self, name: &str) -> bool {
        self.path().join(name).exists()
    }

    /// Read a file from the test directory
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.path().join(name)).expect("Failed to read file")
    }

    /// Install one stand-in tool into bin/
    pub fn install_tool(&self, name: &str, script: &str) {
        let path = self.path().join("bin").join(name);
        std::fs::write(&path, script).expect("Failed to write tool script");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("Failed to mark tool executable");
        }
    }

    /// Install the full set of well-behaved stand-in tools
    pub fn install_happy_tools(&self) {
        self.install_tool("rpm", HAPPY_RPM);
        self.install_tool("yum", HAPPY_YUM);
        self.install_tool("rpmbuild", HAPPY_RPMBUILD);
        self.install_tool("mock", HAPPY_MOCK);
    }

    /// Drop a minimal source rpm stand-in into the test directory
    pub fn seed_srpm(&self, name: &str) {
        self.create_file(name, "not really an rpm");
    }

    /// File names directly under a subdirectory ("" for the root), sorted
    pub fn list_dir(&self, name: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.path().join(name))
            .expect("Failed to read directory")
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// True when `dir` holds a file whose name starts with `prefix`
    pub fn has_artifact(&self, dir: &str, prefix: &str) -> bool {
        self.list_dir(dir)
            .iter()
            .any(|name| name.starts_with(prefix))
    }

    /// Read the single file under `dir` whose name starts with `prefix`
    pub fn read_artifact(&self, dir: &str, prefix: &str) -> String {
        let matches: Vec<String> = self
            .list_dir(dir)
            .into_iter()
            .filter(|name| name.starts_with(prefix))
            .collect();
        assert_eq!(
            matches.len(),
            1,
            "expected exactly one {prefix}* file in {dir}, found {matches:?}"
        );
        if dir.is_empty() {
            self.read_file(&matches[0])
        } else {
            self.read_file(&format!("{dir}/{}", matches[0]))
        }
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the mbuild binary in the test directory with bin/ first in PATH
pub fn run_mbuild(project: &TestProject, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mbuild"));
    cmd.current_dir(project.path());

    let inherited = std::env::var_os("PATH").unwrap_or_default();
    let mut paths = vec![project.path().join("bin")];
    paths.extend(std::env::split_paths(&inherited));
    cmd.env("PATH", std::env::join_paths(paths).expect("Failed to join PATH"));
    cmd.env_remove("MBUILD_WEBHOOK_KEY");
    cmd.env_remove("RUST_LOG");

    for arg in args {
        cmd.arg(arg);
    }
    cmd.output().expect("Failed to execute mbuild")
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Resolves the package name from the query format, materializes a
/// build tree on install and lists a fixed inventory.
pub const HAPPY_RPM: &str = r#"#!/bin/sh
case "$1" in
  -qp)
    base=$(basename "$6")
    printf '%s' "${base%%-*}"
    ;;
  -ivh)
    dir="${3#_topdir }"
    name=$(basename "$4")
    mkdir -p "$dir/SPECS"
    echo "Name: ${name%%-*}" > "$dir/SPECS/${name%%-*}.spec"
    ;;
  -qa)
    printf 'basesystem-11-1\nbash-4.4.20-1\n'
    ;;
esac
exit 0
"#;

/// Reports one resolved dependency on stdout and repo chatter on stderr
pub const HAPPY_YUM: &str = r#"#!/bin/sh
echo "resolving dependencies for $3"
echo 'repo metadata refreshed' >&2
exit 0
"#;

/// Drops a binary rpm into the topdir it was pointed at
pub const HAPPY_RPMBUILD: &str = r#"#!/bin/sh
dir="${2#_topdir }"
spec=$(basename "$4" .spec)
mkdir -p "$dir/RPMS/x86_64"
echo 'binary' > "$dir/RPMS/x86_64/${spec}-1.0-1.x86_64.rpm"
echo "Wrote: $dir/RPMS/x86_64/${spec}-1.0-1.x86_64.rpm"
exit 0
"#;

/// Drops a binary rpm into its result directory
pub const HAPPY_MOCK: &str = r#"#!/bin/sh
echo "building in chroot $2"
echo 'result-1.0-1.x86_64.rpm' > "$6/result-1.0-1.x86_64.rpm"
exit 0
"#;
