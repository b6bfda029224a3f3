//! Watch command implementation
//!
//! Runs the synchronizer over stdin on a single-threaded runtime.

use std::collections::BTreeSet;

use colored::Colorize;
use tokio::io::BufReader;

use devsync_core::{ManagedLayout, PatchOptions, ProcessSignal, Synchronizer, WatchOptions, watch};

use crate::error::Result;

/// Run the watch command until stdin is closed
pub fn run_watch(
    layout: &ManagedLayout,
    requested: Option<BTreeSet<String>>,
    patch: PatchOptions,
    options: WatchOptions,
    process: &str,
) -> Result<()> {
    tracing::info!(
        config = %layout.config_dir().display(),
        workspace = %layout.workspace_dir().display(),
        quiescence_ms = options.quiescence.as_millis() as u64,
        auto_restart = options.auto_restart,
        "Watching for workspace changes"
    );

    let sync = Synchronizer::for_layout(layout, requested, patch);
    let mut restarter = ProcessSignal::new(process);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let summary = runtime.block_on(watch(
        &sync,
        BufReader::new(tokio::io::stdin()),
        &mut restarter,
        options,
    ))?;

    println!(
        "{} {} change(s) applied, {} ignored, {} restart(s)",
        "OK".green().bold(),
        summary.applied,
        summary.ignored,
        summary.restarts
    );
    Ok(())
}
