//! CLI implementation for `mbuild clean` command
//!
//! Removes artifact files from earlier runs. Only plain files carrying
//! the mbuild prefix are touched, build trees stay.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::status;
use crate::config::Settings;
use crate::infra::artifacts::clean_run_files;

/// Execute the clean command
pub async fn execute(workdir: &Path, settings: &Settings) -> Result<()> {
    let report = clean_run_files(workdir)
        .with_context(|| format!("failed to clean {}", workdir.display()))?;

    if settings.quiet {
        return Ok(());
    }

    if report.removed.is_empty() {
        println!("{} Nothing to clean", status::SUCCESS);
    } else {
        println!(
            "{} Removed {} files:",
            status::SUCCESS,
            report.removed.len()
        );
        for path in &report.removed {
            println!("  {}", path.display());
        }
    }
    Ok(())
}
