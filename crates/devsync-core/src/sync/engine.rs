//! Applying change events to the managed configuration root

use std::collections::BTreeSet;
use std::path::Path;

use crate::Result;
use crate::config::{ConfigPatcher, PatchOptions};
use crate::layout::ManagedLayout;
use crate::resources::{JsonResourceStore, ModuleInstaller, ModuleScanner};
use crate::routing::{PostAction, Router};

use super::event::{ChangeEvent, EventKind};

/// Mirrors workspace changes into the configuration root and runs the
/// follow-up work each sync root asks for.
#[derive(Debug)]
pub struct Synchronizer {
    router: Router,
    installer: ModuleInstaller,
    patcher: ConfigPatcher,
}

impl Synchronizer {
    pub fn new(router: Router, installer: ModuleInstaller, patcher: ConfigPatcher) -> Self {
        Self {
            router,
            installer,
            patcher,
        }
    }

    /// Build the synchronizer for a standard workspace layout.
    ///
    /// # Arguments
    ///
    /// * `layout` - Workspace and configuration roots
    /// * `requested` - External module references to keep installed
    /// * `options` - Configuration defaults to inject
    pub fn for_layout(
        layout: &ManagedLayout,
        requested: Option<BTreeSet<String>>,
        options: PatchOptions,
    ) -> Self {
        let installer = ModuleInstaller::new(
            Box::new(JsonResourceStore::new(layout.resources_file())),
            ModuleScanner::new(layout.www_dir()),
            layout.scan_roots(),
        )
        .with_requested(requested);
        let patcher = ConfigPatcher::new(
            layout.configuration_file(),
            layout.integrations_source(),
            options,
        );
        Self::new(Router::new(layout.sync_roots()), installer, patcher)
    }

    /// Apply one event, then its sync root's post-action.
    ///
    /// Returns `false` when the event's directory belongs to no sync root;
    /// nothing is touched in that case.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be written or removed, or
    /// the post-action fails.
    pub fn apply(&self, event: &ChangeEvent) -> Result<bool> {
        let Some(route) = self.router.route(&event.directory) else {
            tracing::debug!(directory = %event.directory.display(), "Ignoring event outside sync roots");
            return Ok(false);
        };
        let target = route.target(&event.file_name);

        match event.kind {
            EventKind::Delete => {
                let removed = devsync_fs::remove_path(&target)?;
                tracing::info!(path = %target.display(), removed, "Removed");
            }
            EventKind::Upsert => {
                let source = event.directory.join(&event.file_name);
                upsert(&source, &target)?;
            }
        }

        match route.root.post_action {
            PostAction::ReconcileResources => {
                self.installer.install()?;
            }
            PostAction::PatchConfig => {
                self.patcher.patch()?;
            }
            PostAction::PatchConfigIfMainDocument => {
                if target == self.patcher.config_file() {
                    self.patcher.patch()?;
                }
            }
        }
        Ok(true)
    }
}

fn upsert(source: &Path, target: &Path) -> Result<()> {
    if source.is_dir() {
        std::fs::create_dir_all(target).map_err(|e| devsync_fs::Error::io(target, e))?;
        tracing::info!(path = %target.display(), "Created directory");
    } else if devsync_fs::copy_atomic(source, target)? {
        tracing::info!(from = %source.display(), to = %target.display(), "Copied");
    }
    Ok(())
}
