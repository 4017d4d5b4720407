//! CLI implementation for `mbuild build` command
//!
//! Batch-builds source rpms on this host, one workspace per package.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::Settings;
use crate::core::context::RunContext;
use crate::core::orchestrator;
use crate::infra::notify::AnyNotifier;

/// Execute the build command
pub async fn execute(
    srpm: &[PathBuf],
    workdir: &Path,
    settings: &Settings,
    ctx: &RunContext,
) -> Result<()> {
    let notifier = AnyNotifier::from_settings(settings);
    let report = orchestrator::run_remote_batch(srpm, workdir, &notifier, ctx).await?;
    super::conclude(&report, settings)
}
