//! Mbuild CLI - unattended batch builder for source rpm packages
//!
//! Entry point for the mbuild command-line application.

use std::io::IsTerminal;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use mbuild::cli::commands::Commands;
use mbuild::cli::output::display_error;
use mbuild::cli::Cli;
use mbuild::config::overlay::Overlay;
use mbuild::config::Settings;
use mbuild::core::context::RunContext;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let overlay = Overlay::load(Path::new("."));
    let settings = Settings::resolve(&cli, &overlay);

    let invocation = std::env::args().collect::<Vec<_>>().join(" ");
    let ctx = RunContext::new(invocation, !settings.quiet);

    // The guard flushes the run log when it drops, keep it to the end
    let log_guard = init_tracing(&cli, &settings, &ctx);

    for file in &overlay.loaded_files {
        tracing::debug!(file = %file.display(), "loaded configuration overlay");
    }

    // Run the command and handle errors
    match cli.run(settings, ctx).await {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            drop(log_guard);
            std::process::exit(1);
        }
    }
}

/// Console logging goes to stderr; `RUST_LOG` overrides the verbosity
/// flags. Commands that run builds also get a stamped run log file in
/// the working directory.
fn init_tracing(cli: &Cli, settings: &Settings, ctx: &RunContext) -> Option<WorkerGuard> {
    let filter = if std::env::var(EnvFilter::DEFAULT_ENV).is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::new(format!("mbuild={level}"))
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal());

    let wants_run_log = cli
        .command
        .as_ref()
        .is_some_and(Commands::writes_run_log);
    let mut log_guard = None;
    let file_layer = (wants_run_log && settings.workdir.is_dir()).then(|| {
        let appender =
            tracing_appender::rolling::never(&settings.workdir, ctx.suffixed("mbuild"));
        let (writer, guard) = tracing_appender::non_blocking(appender);
        log_guard = Some(guard);
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    log_guard
}
