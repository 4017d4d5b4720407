//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod check;
pub mod clean;
pub mod localbuild;
pub mod localinstall;
pub mod mock;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use crate::cli::output::status;
use crate::config::defaults::DEFAULT_MOCK_PROFILE;
use crate::config::Settings;
use crate::core::context::RunContext;
use crate::core::summary::BatchReport;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build source rpms on this host, each in its own workspace
    Build {
        /// Source rpm files to build (scans the working directory if omitted)
        #[arg(short = 's', long = "srpm", num_args = 1..)]
        srpm: Vec<PathBuf>,
    },

    /// Build source rpms inside a mock chroot
    Mock {
        /// Source rpm files to build (scans the working directory if omitted)
        #[arg(short = 's', long = "srpm", num_args = 1..)]
        srpm: Vec<PathBuf>,

        /// Mock configuration to build against
        #[arg(short, long)]
        root: Option<String>,
    },

    /// Install one source rpm into the working directory topdir
    Localinstall {
        /// Source rpm file to install
        #[arg(short = 's', long = "srpm")]
        srpm: PathBuf,
    },

    /// Resolve dependencies and build the topdir in the working directory
    Localbuild,

    /// Remove mbuild artifact files from the working directory
    Clean,

    /// List rpms produced under the working directory
    Check,
}

impl Commands {
    /// Execute the command
    pub async fn run(self, settings: Settings, ctx: RunContext) -> Result<()> {
        let workdir = validate_workdir(&settings.workdir)?;
        match self {
            Self::Build { srpm } => {
                preflight(&[&ctx.tools.rpm, &ctx.tools.yum, &ctx.tools.rpmbuild])?;
                build::execute(&srpm, &workdir, &settings, &ctx).await
            }
            Self::Mock { srpm, root } => {
                preflight(&[&ctx.tools.rpm, &ctx.tools.mock])?;
                let profile = root
                    .or_else(|| settings.mock_root.clone())
                    .unwrap_or_else(|| DEFAULT_MOCK_PROFILE.to_string());
                mock::execute(&srpm, &workdir, &profile, &settings, &ctx).await
            }
            Self::Localinstall { srpm } => {
                preflight(&[&ctx.tools.rpm])?;
                localinstall::execute(&srpm, &workdir, &settings, &ctx).await
            }
            Self::Localbuild => {
                preflight(&[&ctx.tools.rpm, &ctx.tools.yum, &ctx.tools.rpmbuild])?;
                localbuild::execute(&workdir, &settings, &ctx).await
            }
            Self::Clean => clean::execute(&workdir, &settings).await,
            Self::Check => check::execute(&workdir, &settings).await,
        }
    }

    /// Whether this command writes a stamped run log to the working directory
    pub fn writes_run_log(&self) -> bool {
        matches!(
            self,
            Self::Build { .. } | Self::Mock { .. } | Self::Localinstall { .. } | Self::Localbuild
        )
    }
}

/// Print the batch outcome and fail the invocation when any task failed
pub(crate) fn conclude(report: &BatchReport, settings: &Settings) -> Result<()> {
    if report.all_succeeded() {
        if !settings.quiet {
            println!(
                "{} {} of {} builds succeeded",
                status::SUCCESS,
                report.succeeded(),
                report.total()
            );
        }
        return Ok(());
    }

    for (label, stage) in report.failures() {
        eprintln!("{} {label} failed at {stage}", status::ERROR);
    }
    bail!("{} of {} builds failed", report.failed(), report.total());
}

/// The working directory must exist before anything else happens
fn validate_workdir(workdir: &Path) -> Result<PathBuf> {
    if !workdir.is_dir() {
        bail!("'{}' is not a valid directory", workdir.display());
    }
    workdir
        .canonicalize()
        .with_context(|| format!("cannot resolve '{}'", workdir.display()))
}

/// Refuse to start when a required tool is missing from PATH
fn preflight(tools: &[&str]) -> Result<()> {
    let missing: Vec<&str> = tools
        .iter()
        .copied()
        .filter(|tool| which::which(tool).is_err())
        .collect();
    if !missing.is_empty() {
        bail!("required tools not found in PATH: {}", missing.join(", "));
    }
    Ok(())
}
