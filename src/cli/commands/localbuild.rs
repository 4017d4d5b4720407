//! CLI implementation for `mbuild localbuild` command
//!
//! Verifies the build tree already staged in the working directory, then
//! resolves dependencies and compiles it.

use std::path::Path;

use anyhow::Result;

use crate::config::Settings;
use crate::core::context::RunContext;
use crate::core::orchestrator;
use crate::infra::notify::AnyNotifier;

/// Execute the localbuild command
pub async fn execute(workdir: &Path, settings: &Settings, ctx: &RunContext) -> Result<()> {
    let notifier = AnyNotifier::from_settings(settings);
    let report = orchestrator::run_local_build(workdir, &notifier, ctx).await;
    super::conclude(&report, settings)
}
