//! Error types for mbuild
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Run configuration errors
///
/// These abort the whole invocation before any build task is attempted.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source package named on the command line does not exist
    #[error("'{path}' is not a valid srpm file")]
    SourceNotFound { path: PathBuf },

    /// Directory scan produced no source packages
    #[error("no *.src.rpm found in {dir}")]
    NoSources { dir: PathBuf },

    /// The working directory could not be scanned
    #[error("cannot scan {dir}: {error}")]
    Scan { dir: PathBuf, error: String },
}

/// Command execution errors
///
/// A child exiting non-zero is NOT an error here; these cover the cases
/// where no exit status could be obtained at all.
#[derive(Error, Debug)]
pub enum ExecutorError {
    /// The child process could not be spawned
    #[error("failed to launch '{program}': {error}")]
    Spawn { program: String, error: String },

    /// A stdio pipe was not available after spawn
    #[error("failed to capture {stream} of '{program}'")]
    Pipe {
        program: String,
        stream: &'static str,
    },

    /// Reading one of the output streams failed
    #[error("error reading child {stream}: {error}")]
    StreamIo {
        stream: &'static str,
        error: String,
    },

    /// A stream drain task was cancelled or panicked
    #[error("child {stream} reader aborted: {error}")]
    StreamTask {
        stream: &'static str,
        error: String,
    },

    /// Waiting on the child failed
    #[error("failed waiting for '{program}': {error}")]
    Wait { program: String, error: String },
}

/// Workspace layout errors
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// Layout was requested before the package name was resolved
    #[error("package name for '{source_path}' is not resolved yet")]
    NameUnresolved { source_path: PathBuf },

    /// Failed to create a workspace directory
    #[error("failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },
}

/// Artifact persistence errors
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Failed to write an artifact file
    #[error("failed to write '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read a directory while scanning
    #[error("failed to read directory '{path}': {error}")]
    ReadDir { path: PathBuf, error: String },

    /// Failed to remove a run file
    #[error("failed to remove '{path}': {error}")]
    RemoveFile { path: PathBuf, error: String },
}

/// Notification delivery errors
///
/// Never fatal: callers log these and carry on.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The HTTP request itself failed
    #[error("webhook request failed: {error}")]
    Request { error: String },

    /// The endpoint answered with a non-success HTTP status
    #[error("webhook returned HTTP {status}")]
    Http { status: u16 },

    /// The endpoint accepted the request but rejected the message
    #[error("webhook rejected message: [{code}] {message}")]
    Api { code: i64, message: String },
}

/// Why a pipeline stage failed
///
/// Distinguishes a tool exiting non-zero from the tool never running,
/// from the stage's own validation, and from artifact persistence.
#[derive(Error, Debug)]
pub enum StageFailure {
    /// The stage's tool ran and exited non-zero
    #[error("exited with status {code}")]
    NonZeroExit { code: i32 },

    /// The stage's tool could not be executed
    #[error(transparent)]
    Executor(#[from] ExecutorError),

    /// Workspace resolution or creation failed
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// A required artifact could not be persisted
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// The tool succeeded but its result fails the stage's own checks
    #[error("{0}")]
    Semantic(String),
}
