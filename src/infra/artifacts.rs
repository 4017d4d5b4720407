//! Durable run artifacts
//!
//! Stages persist captured tool output as plain files next to the build
//! they belong to. Everything written here carries the `mbuild_` prefix,
//! which is also what the clean command keys on.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::defaults::ARTIFACT_PREFIX;
use crate::error::ArtifactError;

/// Write one artifact file, replacing any previous content
pub fn write_artifact(path: &Path, contents: &str) -> Result<(), ArtifactError> {
    fs::write(path, contents).map_err(|error| ArtifactError::WriteFile {
        path: path.to_path_buf(),
        error: error.to_string(),
    })
}

/// Write a tool log, standard output first, standard error after it
pub fn write_combined_log(path: &Path, stdout: &str, stderr: &str) -> Result<(), ArtifactError> {
    let mut contents = String::with_capacity(stdout.len() + stderr.len());
    contents.push_str(stdout);
    contents.push_str(stderr);
    write_artifact(path, &contents)
}

/// Files removed by one clean pass
#[derive(Debug, Default)]
pub struct CleanReport {
    pub removed: Vec<PathBuf>,
}

/// Remove `mbuild_`-prefixed files directly under `workdir`.
///
/// Only plain files are touched. Package directories and build roots
/// are left alone.
pub fn clean_run_files(workdir: &Path) -> Result<CleanReport, ArtifactError> {
    let entries = fs::read_dir(workdir).map_err(|error| ArtifactError::ReadDir {
        path: workdir.to_path_buf(),
        error: error.to_string(),
    })?;

    let mut targets: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|error| ArtifactError::ReadDir {
            path: workdir.to_path_buf(),
            error: error.to_string(),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with(ARTIFACT_PREFIX) {
            targets.push(path);
        }
    }
    targets.sort();

    let mut report = CleanReport::default();
    for path in targets {
        fs::remove_file(&path).map_err(|error| ArtifactError::RemoveFile {
            path: path.clone(),
            error: error.to_string(),
        })?;
        report.removed.push(path);
    }
    Ok(report)
}

/// Rpm files found under one directory
#[derive(Debug, PartialEq, Eq)]
pub struct RpmGroup {
    pub dir: PathBuf,
    pub rpms: Vec<String>,
}

/// Walk `root` and group every `*.rpm` file by its parent directory.
///
/// Groups come back ordered by directory path, file names sorted within
/// each group. Unreadable entries are skipped.
pub fn find_rpm_groups(root: &Path) -> Vec<RpmGroup> {
    let mut groups: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();

    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !name.ends_with(".rpm") {
            continue;
        }
        let dir = entry.path().parent().unwrap_or(root).to_path_buf();
        groups.entry(dir).or_default().push(name.to_string());
    }

    groups
        .into_iter()
        .map(|(dir, mut rpms)| {
            rpms.sort();
            RpmGroup { dir, rpms }
        })
        .collect()
}
