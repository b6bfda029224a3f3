//! Persistence of the installed resource list

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

use super::{ModuleRecord, ResourceMap, TIMESTAMP_QUERY, split_reference};
use crate::Result;

/// Storage key the consuming application files the list under
const STORAGE_KEY: &str = "lovelace_resources";
/// Resource type written for every entry
const MODULE_TYPE: &str = "module";

/// Load/save access to the persisted resource list.
///
/// Reconciliation never holds this state itself; callers load it, pass it
/// in explicitly and save the result.
pub trait ResourceStore: Send + Sync {
    /// Load the stored mapping. An absent document yields an empty mapping.
    fn load(&self) -> Result<ResourceMap>;

    /// Persist `resources`, minting identities for records that lack one.
    ///
    /// Minted identities are written back into `resources`.
    fn save(&self, resources: &mut ResourceMap) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct ResourceDocument {
    version: u32,
    minor_version: u32,
    key: String,
    data: ResourceData,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ResourceData {
    #[serde(default)]
    items: Vec<ResourceItem>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ResourceItem {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    url: String,
}

/// Resource list stored as the application's JSON storage document.
#[derive(Debug, Clone)]
pub struct JsonResourceStore {
    path: PathBuf,
}

impl JsonResourceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResourceStore for JsonResourceStore {
    fn load(&self) -> Result<ResourceMap> {
        let content = match devsync_fs::read_text(&self.path) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %self.path.display(), "No resource list yet, starting empty");
                return Ok(ResourceMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        let document: ResourceDocument = serde_json::from_str(&content)?;
        let mut resources = ResourceMap::new();
        for item in document.data.items {
            let (reference, timestamp) = split_reference(&item.url);
            resources.insert(reference.to_string(), ModuleRecord::new(item.id, timestamp));
        }
        Ok(resources)
    }

    fn save(&self, resources: &mut ResourceMap) -> Result<()> {
        let items = resources
            .iter_mut()
            .map(|(reference, record)| ResourceItem {
                id: record.ensure_id().to_string(),
                kind: MODULE_TYPE.to_string(),
                url: match record.timestamp {
                    Some(timestamp) => format!("{reference}{TIMESTAMP_QUERY}{timestamp}"),
                    None => reference.clone(),
                },
            })
            .collect();

        let document = ResourceDocument {
            version: 1,
            minor_version: 1,
            key: STORAGE_KEY.to_string(),
            data: ResourceData { items },
        };

        let mut content = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut content, PrettyFormatter::with_indent(b"    "));
        document.serialize(&mut serializer)?;

        devsync_fs::write_atomic(&self.path, &content)?;
        tracing::debug!(path = %self.path.display(), count = resources.len(), "Saved resource list");
        Ok(())
    }
}
