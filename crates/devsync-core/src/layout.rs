//! Directory layout of the workspace and the managed configuration root

use std::path::{Path, PathBuf};

use crate::resources::ScanRoot;
use crate::routing::{PostAction, SyncRoot};

/// Workspace directory holding built frontend modules
const WORKSPACE_PLUGINS: &str = "dist";
/// Workspace directory holding custom integrations
const WORKSPACE_INTEGRATIONS: &str = "custom_components";
/// Workspace directory holding a test configuration
const WORKSPACE_TEST_CONFIG: &str = "test/config";

/// Extensions of loadable frontend modules
const MODULE_EXTENSIONS: [&str; 2] = ["js", "mjs"];

/// Locations of everything devsync reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedLayout {
    config_dir: PathBuf,
    workspace_dir: PathBuf,
}

impl ManagedLayout {
    pub fn new(config_dir: impl Into<PathBuf>, workspace_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            workspace_dir: workspace_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn workspace_dir(&self) -> &Path {
        &self.workspace_dir
    }

    /// `configuration.yaml` of the managed instance
    pub fn configuration_file(&self) -> PathBuf {
        self.config_dir.join("configuration.yaml")
    }

    /// Persisted resource list
    pub fn resources_file(&self) -> PathBuf {
        self.config_dir.join(".storage").join("lovelace_resources")
    }

    /// Root that local module references are relative to
    pub fn www_dir(&self) -> PathBuf {
        self.config_dir.join("www")
    }

    /// Directory the workspace modules are mirrored into
    pub fn module_dir(&self) -> PathBuf {
        self.www_dir().join("workspace")
    }

    pub fn integrations_source(&self) -> PathBuf {
        self.workspace_dir.join(WORKSPACE_INTEGRATIONS)
    }

    /// Sync roots mirroring the workspace into the configuration root
    pub fn sync_roots(&self) -> Vec<SyncRoot> {
        vec![
            SyncRoot::new(
                self.workspace_dir.join(WORKSPACE_PLUGINS),
                self.module_dir(),
                PostAction::ReconcileResources,
            ),
            SyncRoot::new(
                self.integrations_source(),
                self.config_dir.join(WORKSPACE_INTEGRATIONS),
                PostAction::PatchConfig,
            ),
            SyncRoot::new(
                self.workspace_dir.join(WORKSPACE_TEST_CONFIG),
                self.config_dir.clone(),
                PostAction::PatchConfigIfMainDocument,
            ),
        ]
    }

    /// Roots searched for local modules
    pub fn scan_roots(&self) -> Vec<ScanRoot> {
        vec![ScanRoot::new(self.module_dir(), false, &MODULE_EXTENSIONS)]
    }
}
