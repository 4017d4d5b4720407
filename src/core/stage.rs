//! Stage identities and per-stage results
//!
//! Every pipeline step records a `StageResult`, successful or not, so a
//! finished task carries the full history of what ran and what it
//! printed. A result with a `failure` short-circuits the pipeline it
//! belongs to.

use std::fmt;
use std::path::PathBuf;

use crate::error::StageFailure;
use crate::infra::executor::ExecutionResult;

/// Fixed names of the pipeline steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageName {
    ResolveName,
    StageWorkspace,
    Materialize,
    SnapshotInventory,
    ResolveDeps,
    Compile,
    IsolatedBuild,
}

impl StageName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ResolveName => "resolve-name",
            Self::StageWorkspace => "stage-workspace",
            Self::Materialize => "materialize",
            Self::SnapshotInventory => "snapshot-inventory",
            Self::ResolveDeps => "resolve-deps",
            Self::Compile => "compile",
            Self::IsolatedBuild => "isolated-build",
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one executed stage
#[derive(Debug)]
pub struct StageResult {
    pub stage: StageName,
    /// Exit code of the stage's tool, `-1` when nothing ran
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Files this stage persisted
    pub artifacts: Vec<PathBuf>,
    pub failure: Option<StageFailure>,
}

impl StageResult {
    /// Wrap a finished tool run, failing the stage on non-zero exit
    pub fn from_execution(stage: StageName, result: ExecutionResult) -> Self {
        let failure = (!result.success()).then(|| StageFailure::NonZeroExit {
            code: result.exit_code,
        });
        Self {
            stage,
            exit_code: result.exit_code,
            stdout: result.stdout,
            stderr: result.stderr,
            artifacts: Vec::new(),
            failure,
        }
    }

    /// Record a stage that failed before or after its tool could run
    pub fn from_failure(stage: StageName, failure: StageFailure) -> Self {
        Self {
            stage,
            exit_code: -1,
            stdout: String::new(),
            stderr: String::new(),
            artifacts: Vec::new(),
            failure: Some(failure),
        }
    }

    /// Record a stage that succeeded without running a tool
    pub fn ok(stage: StageName) -> Self {
        Self {
            stage,
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
            artifacts: Vec::new(),
            failure: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn add_artifact(&mut self, path: impl Into<PathBuf>) {
        self.artifacts.push(path.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names_render_kebab_case() {
        assert_eq!(StageName::ResolveName.to_string(), "resolve-name");
        assert_eq!(StageName::SnapshotInventory.to_string(), "snapshot-inventory");
        assert_eq!(StageName::IsolatedBuild.to_string(), "isolated-build");
    }

    #[test]
    fn test_zero_exit_is_success() {
        let result = StageResult::from_execution(
            StageName::Compile,
            ExecutionResult {
                exit_code: 0,
                stdout: "built\n".to_string(),
                stderr: String::new(),
            },
        );
        assert!(result.is_success());
        assert!(result.failure.is_none());
    }

    #[test]
    fn test_nonzero_exit_fails_the_stage() {
        let result = StageResult::from_execution(
            StageName::ResolveDeps,
            ExecutionResult {
                exit_code: 1,
                stdout: String::new(),
                stderr: "no such package\n".to_string(),
            },
        );
        assert!(!result.is_success());
        assert!(matches!(
            result.failure,
            Some(StageFailure::NonZeroExit { code: 1 })
        ));
    }

    #[test]
    fn test_from_failure_carries_no_exit_code() {
        let result = StageResult::from_failure(
            StageName::ResolveName,
            StageFailure::Semantic("empty package name".to_string()),
        );
        assert_eq!(result.exit_code, -1);
        assert!(!result.is_success());
    }
}
