//! One package build and its recorded history

use std::path::PathBuf;

use crate::config::defaults::SOURCE_PACKAGE_SUFFIX;
use crate::core::stage::{StageName, StageResult};
use crate::core::workspace::Workspace;

/// Where a task ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Pending,
    Succeeded,
    FailedAt(StageName),
}

/// Build state for a single source package
///
/// A task accumulates stage results as its pipeline runs. The first
/// recorded failure fixes the outcome; later results are still stored
/// but cannot change it.
#[derive(Debug)]
pub struct BuildTask {
    pub source_path: PathBuf,
    /// Package name once the resolve-name stage produced it
    pub package_name: Option<String>,
    pub workspace: Option<Workspace>,
    stage_results: Vec<StageResult>,
    outcome: TaskOutcome,
}

impl BuildTask {
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            package_name: None,
            workspace: None,
            stage_results: Vec::new(),
            outcome: TaskOutcome::Pending,
        }
    }

    pub fn record(&mut self, result: StageResult) {
        if result.failure.is_some() && self.outcome == TaskOutcome::Pending {
            self.outcome = TaskOutcome::FailedAt(result.stage);
        }
        self.stage_results.push(result);
    }

    /// Mark the task finished; with no recorded failure it succeeded
    pub fn complete(&mut self) {
        if self.outcome == TaskOutcome::Pending {
            self.outcome = TaskOutcome::Succeeded;
        }
    }

    pub fn outcome(&self) -> TaskOutcome {
        self.outcome
    }

    pub fn succeeded(&self) -> bool {
        self.outcome == TaskOutcome::Succeeded
    }

    pub fn stage_results(&self) -> &[StageResult] {
        &self.stage_results
    }

    pub fn failed_stage(&self) -> Option<StageName> {
        match self.outcome {
            TaskOutcome::FailedAt(stage) => Some(stage),
            _ => None,
        }
    }

    /// Best available display name, the resolved package name when known
    pub fn label(&self) -> String {
        if let Some(name) = &self.package_name {
            return name.clone();
        }
        let file = self
            .source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string());
        if let Some(stripped) = file.strip_suffix(SOURCE_PACKAGE_SUFFIX) {
            return stripped.to_string();
        }
        file
    }
}
