//! devsync CLI
//!
//! Mirrors a development workspace into a managed Home Assistant
//! configuration directory.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: info for devsync crates)
//!
//! Logs go to stderr; stdout carries command output only.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, watch_options};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    execute_command(cli)
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(format!(
                "devsync={level},devsync_core={level},devsync_fs={level}"
            ))
        })
        .map_err(|e| CliError::user(format!("Invalid log filter: {}", e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {}", e)))?;
    tracing::debug!("Verbose mode enabled");
    Ok(())
}

fn execute_command(cli: Cli) -> Result<()> {
    let layout = cli.paths.layout();
    match cli.command {
        Commands::Watch {
            modules,
            patch,
            auto_restart,
            quiescence_ms,
            process,
        } => commands::run_watch(
            &layout,
            modules.requested(),
            patch.options(),
            watch_options(auto_restart, quiescence_ms),
            &process,
        ),
        Commands::InstallModules { modules } => {
            commands::run_install_modules(&layout, modules.requested())
        }
        Commands::UpdateConfig { patch } => commands::run_update_config(&layout, patch.options()),
    }
}
