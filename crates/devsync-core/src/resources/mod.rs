//! Installed frontend module resources
//!
//! The managed application keeps a flat list of module resources it loads
//! into the frontend. This module provides:
//! - **store**: persistence of that list (`ResourceStore`, `JsonResourceStore`)
//! - **scanner**: discovery of local module files (`ModuleScanner`)
//! - **reconcile**: the merge of stored, discovered and requested references
//! - **installer**: the load, scan, reconcile, save cycle

mod installer;
mod reconcile;
mod scanner;
mod store;

pub use installer::ModuleInstaller;
pub use reconcile::{Provenance, reconcile};
pub use scanner::{ModuleScanner, ScanRoot};
pub use store::{JsonResourceStore, ResourceStore};

use std::collections::{BTreeMap, BTreeSet};

use uuid::Uuid;

/// Namespace tag prefixed to every locally discovered module reference
pub const LOCAL_NAMESPACE: &str = "local/";

/// URL query that carries the cache-busting timestamp
pub(crate) const TIMESTAMP_QUERY: &str = "?t=";

/// Mapping of module reference to its persisted metadata
pub type ResourceMap = BTreeMap<String, ModuleRecord>;

/// Metadata kept for one module reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRecord {
    /// Stable identity; minted on first save and never changed afterwards
    pub id: Option<String>,
    /// Cache-busting timestamp, the backing file's mtime for local modules
    pub timestamp: Option<u64>,
}

impl ModuleRecord {
    pub fn new(id: impl Into<String>, timestamp: Option<u64>) -> Self {
        Self {
            id: Some(id.into()),
            timestamp,
        }
    }

    /// Return the identity, minting a fresh one if absent.
    pub fn ensure_id(&mut self) -> &str {
        self.id
            .get_or_insert_with(|| Uuid::new_v4().simple().to_string())
            .as_str()
    }
}

/// Parse a semicolon-delimited list of module references.
///
/// Whitespace around entries is trimmed and empty entries are dropped.
pub fn parse_module_list(raw: &str) -> BTreeSet<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split a resource URL into its reference and optional cache-busting timestamp.
///
/// A suffix whose value is not an integer is kept as part of the reference.
pub fn split_reference(url: &str) -> (&str, Option<u64>) {
    match url.rsplit_once(TIMESTAMP_QUERY) {
        Some((reference, raw)) => match raw.parse() {
            Ok(timestamp) => (reference, Some(timestamp)),
            Err(_) => (url, None),
        },
        None => (url, None),
    }
}
