//! Mapping of change-event directories onto destination trees

use std::path::{Path, PathBuf};

/// Work to run after a file in a sync root changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    /// Reconcile the installed module resources
    ReconcileResources,
    /// Patch the configuration document
    PatchConfig,
    /// Patch the configuration document, but only when it is the changed file
    PatchConfigIfMainDocument,
}

/// One source tree mirrored onto a destination tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRoot {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub post_action: PostAction,
}

impl SyncRoot {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        post_action: PostAction,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            post_action,
        }
    }
}

/// Where an event's directory lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route<'a> {
    /// The matched sync root
    pub root: &'a SyncRoot,
    /// Destination directory corresponding to the event's directory
    pub destination_dir: PathBuf,
}

impl Route<'_> {
    /// Destination path of `file_name` within the routed directory.
    pub fn target(&self, file_name: &str) -> PathBuf {
        self.destination_dir.join(file_name)
    }
}

/// Static table of sync roots.
#[derive(Debug, Clone, Default)]
pub struct Router {
    roots: Vec<SyncRoot>,
}

impl Router {
    pub fn new(roots: Vec<SyncRoot>) -> Self {
        Self { roots }
    }

    /// Resolve `directory` against the table.
    ///
    /// The root with the longest matching source prefix wins, so nested
    /// roots take precedence over their parents. Returns `None` for
    /// directories outside every root.
    pub fn route(&self, directory: &Path) -> Option<Route<'_>> {
        let root = self
            .roots
            .iter()
            .filter(|root| devsync_fs::is_within(directory, &root.source))
            .max_by_key(|root| root.source.components().count())?;

        let relative = devsync_fs::relative_to(directory, &root.source)?;
        let destination_dir = if relative.as_os_str().is_empty() {
            root.destination.clone()
        } else {
            root.destination.join(relative)
        };
        Some(Route {
            root,
            destination_dir,
        })
    }
}
