//! Install-modules command implementation

use std::collections::BTreeSet;

use colored::Colorize;

use devsync_core::{JsonResourceStore, ManagedLayout, ModuleInstaller, ModuleScanner};

use crate::error::Result;

/// Reconcile the resource list against local modules and `requested`
pub fn run_install_modules(
    layout: &ManagedLayout,
    requested: Option<BTreeSet<String>>,
) -> Result<()> {
    let installer = ModuleInstaller::new(
        Box::new(JsonResourceStore::new(layout.resources_file())),
        ModuleScanner::new(layout.www_dir()),
        layout.scan_roots(),
    )
    .with_requested(requested);

    let resources = installer.install()?;

    println!(
        "{} {} module resource(s) installed",
        "OK".green().bold(),
        resources.len()
    );
    for reference in resources.keys() {
        println!("   {} {}", "-".dimmed(), reference.cyan());
    }
    Ok(())
}
