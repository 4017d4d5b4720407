//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no build logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::Settings;
use crate::core::context::RunContext;
use commands::Commands;

/// Mbuild - unattended batch builder for source rpm packages
///
/// Builds every source rpm it is pointed at, one after another, and
/// leaves a stamped artifact trail next to each build.
#[derive(Parser, Debug)]
#[command(name = "mbuild")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Working directory to operate on
    #[arg(short, long, global = true)]
    pub workdir: Option<PathBuf>,

    /// Output directory for isolated build results
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress status output and notifications
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Skip the summary notification
    #[arg(long, global = true)]
    pub no_notify: bool,

    /// Webhook key for summary notifications
    #[arg(
        long,
        env = "MBUILD_WEBHOOK_KEY",
        hide_env_values = true,
        global = true
    )]
    pub webhook_key: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self, settings: Settings, ctx: RunContext) -> Result<()> {
        if let Some(cmd) = self.command {
            cmd.run(settings, ctx).await
        } else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
