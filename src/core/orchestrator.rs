//! Batch orchestration
//!
//! One invocation runs one pipeline per source package, sequentially and
//! unattended. A failing package is recorded and the loop moves on, only
//! a broken run configuration stops the batch before it starts. When all
//! tasks are done the summary goes to the notification sink exactly once.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::config::defaults::{SOURCE_PACKAGE_SUFFIX, STAMP_FORMAT};
use crate::core::context::RunContext;
use crate::core::pipeline;
use crate::core::summary::BatchReport;
use crate::error::ConfigError;
use crate::infra::notify::Notifier;

/// Determine the source packages one invocation operates on.
///
/// Explicit paths are validated and taken as given. Without any, the
/// working directory is scanned for `*.src.rpm` files in name order.
pub fn collect_sources(explicit: &[PathBuf], workdir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    if !explicit.is_empty() {
        let mut sources = Vec::with_capacity(explicit.len());
        for path in explicit {
            if !path.is_file() {
                return Err(ConfigError::SourceNotFound { path: path.clone() });
            }
            let canonical = path
                .canonicalize()
                .map_err(|_| ConfigError::SourceNotFound { path: path.clone() })?;
            sources.push(canonical);
        }
        return Ok(sources);
    }

    let entries = fs::read_dir(workdir).map_err(|error| ConfigError::Scan {
        dir: workdir.to_path_buf(),
        error: error.to_string(),
    })?;

    let mut sources: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|error| ConfigError::Scan {
            dir: workdir.to_path_buf(),
            error: error.to_string(),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.ends_with(SOURCE_PACKAGE_SUFFIX) {
            sources.push(path);
        }
    }
    sources.sort();

    if sources.is_empty() {
        return Err(ConfigError::NoSources {
            dir: workdir.to_path_buf(),
        });
    }
    Ok(sources)
}

/// Run the remote pipeline over a batch of source packages
pub async fn run_remote_batch<N: Notifier>(
    explicit: &[PathBuf],
    workdir: &Path,
    notifier: &N,
    ctx: &RunContext,
) -> Result<BatchReport, ConfigError> {
    let sources = collect_sources(explicit, workdir)?;
    let total = sources.len();

    let mut report = BatchReport::new();
    for (index, source) in sources.iter().enumerate() {
        tracing::info!("[{}/{total}] build {}", index + 1, source.display());
        report.record(pipeline::run_remote(source, ctx).await);
    }

    send_report(&report, notifier, ctx).await;
    Ok(report)
}

/// Run the isolated pipeline over a batch of source packages
pub async fn run_isolated_batch<N: Notifier>(
    explicit: &[PathBuf],
    workdir: &Path,
    output: Option<&Path>,
    profile: &str,
    notifier: &N,
    ctx: &RunContext,
) -> Result<BatchReport, ConfigError> {
    let sources = collect_sources(explicit, workdir)?;
    let total = sources.len();

    let mut report = BatchReport::new();
    for (index, source) in sources.iter().enumerate() {
        tracing::info!("[{}/{total}] mock build {}", index + 1, source.display());
        report.record(pipeline::run_isolated(source, output, profile, ctx).await);
    }

    send_report(&report, notifier, ctx).await;
    Ok(report)
}

/// Build the already materialized tree in `workdir`
pub async fn run_local_build<N: Notifier>(
    workdir: &Path,
    notifier: &N,
    ctx: &RunContext,
) -> BatchReport {
    tracing::info!("local build in {}", workdir.display());

    let mut report = BatchReport::new();
    report.record(pipeline::run_local_build(workdir, ctx).await);

    send_report(&report, notifier, ctx).await;
    report
}

/// Install one source package into the topdir at `workdir`
pub async fn run_local_install<N: Notifier>(
    source: &Path,
    workdir: &Path,
    notifier: &N,
    ctx: &RunContext,
) -> Result<BatchReport, ConfigError> {
    if !source.is_file() {
        return Err(ConfigError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }

    tracing::info!("install {} into {}", source.display(), workdir.display());

    let mut report = BatchReport::new();
    report.record(pipeline::run_local_install(source, workdir, ctx).await);

    send_report(&report, notifier, ctx).await;
    Ok(report)
}

/// Deliver the summary once; a failed delivery is logged, never fatal
async fn send_report<N: Notifier>(report: &BatchReport, notifier: &N, ctx: &RunContext) {
    let finished = Local::now().format(STAMP_FORMAT).to_string();
    let message = report.render_markdown(ctx, &finished);
    if let Err(error) = notifier.send_markdown(&message).await {
        tracing::warn!(%error, "summary notification failed");
    }
}
