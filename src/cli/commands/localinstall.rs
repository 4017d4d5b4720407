//! CLI implementation for `mbuild localinstall` command
//!
//! Installs one source rpm into the working directory, treating it as
//! the rpmbuild topdir. Typically followed by `mbuild localbuild`.

use std::path::Path;

use anyhow::Result;

use crate::config::Settings;
use crate::core::context::RunContext;
use crate::core::orchestrator;
use crate::infra::notify::AnyNotifier;

/// Execute the localinstall command
pub async fn execute(
    srpm: &Path,
    workdir: &Path,
    settings: &Settings,
    ctx: &RunContext,
) -> Result<()> {
    let notifier = AnyNotifier::from_settings(settings);
    let report = orchestrator::run_local_install(srpm, workdir, &notifier, ctx).await?;
    super::conclude(&report, settings)
}
