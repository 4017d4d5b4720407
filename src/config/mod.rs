//! Configuration and constants
//!
//! Settings are resolved in three layers: an explicit command-line flag
//! beats the `*.mbuild` overlay, and the overlay beats built-in defaults.

pub mod defaults;
pub mod overlay;

use std::path::PathBuf;

use crate::cli::Cli;
use overlay::Overlay;

/// Effective settings for one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    /// Working directory commands operate on
    pub workdir: PathBuf,
    /// Output directory for isolated builds
    pub output: Option<PathBuf>,
    /// Suppress status output and notifications
    pub quiet: bool,
    /// Whether a summary notification should be attempted
    pub notify: bool,
    /// Webhook key the summary is delivered with
    pub webhook_key: Option<String>,
    /// Overlay-provided isolated build profile
    pub mock_root: Option<String>,
}

impl Settings {
    /// Merge command-line arguments with the configuration overlay
    pub fn resolve(cli: &Cli, overlay: &Overlay) -> Self {
        let workdir = cli
            .workdir
            .clone()
            .or_else(|| overlay.get("workdir").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("."));

        let output = cli
            .output
            .clone()
            .or_else(|| overlay.get("output").map(PathBuf::from));

        let quiet = cli.quiet || overlay.get_flag("quiet").unwrap_or(false);

        let webhook_key = cli
            .webhook_key
            .clone()
            .or_else(|| overlay.get("webhook").map(String::from));

        Self {
            workdir,
            output,
            quiet,
            notify: !quiet && !cli.no_notify,
            webhook_key,
            mock_root: overlay.get("root").map(String::from),
        }
    }
}
