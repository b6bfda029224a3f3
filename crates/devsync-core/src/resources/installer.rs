//! Load, scan, reconcile and save cycle for the resource list

use std::collections::BTreeSet;

use super::{ModuleScanner, ResourceMap, ResourceStore, ScanRoot, reconcile};
use crate::Result;

/// Keeps the persisted resource list in step with the local module files.
pub struct ModuleInstaller {
    store: Box<dyn ResourceStore>,
    scanner: ModuleScanner,
    roots: Vec<ScanRoot>,
    requested: Option<BTreeSet<String>>,
}

impl std::fmt::Debug for ModuleInstaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleInstaller")
            .field("scanner", &self.scanner)
            .field("roots", &self.roots)
            .field("requested", &self.requested)
            .finish_non_exhaustive()
    }
}

impl ModuleInstaller {
    pub fn new(store: Box<dyn ResourceStore>, scanner: ModuleScanner, roots: Vec<ScanRoot>) -> Self {
        Self {
            store,
            scanner,
            roots,
            requested: None,
        }
    }

    /// Explicit references to keep installed alongside the local modules.
    pub fn with_requested(mut self, requested: Option<BTreeSet<String>>) -> Self {
        self.requested = requested;
        self
    }

    /// Run one reconciliation and persist the result.
    ///
    /// Returns the mapping as saved, identities included.
    pub fn install(&self) -> Result<ResourceMap> {
        let previous = self.store.load()?;
        let discovered = self.scanner.scan(&self.roots)?;
        let mut resources = reconcile(previous, &discovered, self.requested.as_ref());
        self.store.save(&mut resources)?;

        tracing::info!(
            modules = resources.len(),
            discovered = discovered.len(),
            "Reconciled module resources"
        );
        Ok(resources)
    }
}
