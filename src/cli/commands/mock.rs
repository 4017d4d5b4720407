//! CLI implementation for `mbuild mock` command
//!
//! Hands each source rpm to mock for a build inside a clean chroot.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::Settings;
use crate::core::context::RunContext;
use crate::core::orchestrator;
use crate::infra::notify::AnyNotifier;

/// Execute the mock command
pub async fn execute(
    srpm: &[PathBuf],
    workdir: &Path,
    profile: &str,
    settings: &Settings,
    ctx: &RunContext,
) -> Result<()> {
    let notifier = AnyNotifier::from_settings(settings);
    let output = settings.output.as_deref();
    let report =
        orchestrator::run_isolated_batch(srpm, workdir, output, profile, &notifier, ctx).await?;
    super::conclude(&report, settings)
}
