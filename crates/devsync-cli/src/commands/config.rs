//! Update-config command implementation

use colored::Colorize;

use devsync_core::{ConfigPatcher, ManagedLayout, PatchOptions, PatchOutcome};

use crate::error::Result;

/// Patch configuration.yaml once
pub fn run_update_config(layout: &ManagedLayout, options: PatchOptions) -> Result<()> {
    let patcher = ConfigPatcher::new(
        layout.configuration_file(),
        layout.integrations_source(),
        options,
    );

    match patcher.patch()? {
        PatchOutcome::Written => {
            println!("{} Configuration file updated.", "OK".green().bold());
        }
        PatchOutcome::Unchanged => {
            println!("{} Configuration file already up to date.", "OK".green().bold());
        }
        PatchOutcome::Skipped { reason } => {
            println!("{} Configuration file not updated: {}", "SKIPPED".yellow().bold(), reason);
        }
    }
    Ok(())
}
