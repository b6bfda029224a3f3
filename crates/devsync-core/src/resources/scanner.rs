//! Discovery of local module files

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::LOCAL_NAMESPACE;
use crate::Result;

/// One directory to search for module files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRoot {
    pub directory: PathBuf,
    /// Descend into sub-directories
    pub recursive: bool,
    /// Accepted file extensions, without the leading dot
    pub extensions: Vec<String>,
}

impl ScanRoot {
    pub fn new(directory: impl Into<PathBuf>, recursive: bool, extensions: &[&str]) -> Self {
        Self {
            directory: directory.into(),
            recursive,
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
    }
}

/// Enumerates module files and derives their references.
///
/// A reference is the file's path relative to the namespace root, prefixed
/// with the namespace tag: `<www>/workspace/card.js` becomes
/// `local/workspace/card.js`.
#[derive(Debug, Clone)]
pub struct ModuleScanner {
    namespace_root: PathBuf,
    tag: String,
}

impl ModuleScanner {
    pub fn new(namespace_root: impl Into<PathBuf>) -> Self {
        Self {
            namespace_root: namespace_root.into(),
            tag: LOCAL_NAMESPACE.to_string(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Scan `roots` in order, returning reference -> mtime in seconds.
    ///
    /// A root that does not exist contributes nothing.
    pub fn scan(&self, roots: &[ScanRoot]) -> Result<BTreeMap<String, u64>> {
        let mut found = BTreeMap::new();
        for root in roots {
            let mut files = Vec::new();
            collect_files(&root.directory, root, &mut files)?;
            tracing::debug!(root = %root.directory.display(), count = files.len(), "Scanned module root");

            for file in files {
                let timestamp = match devsync_fs::modified_secs(&file) {
                    Ok(timestamp) => timestamp,
                    // Deleted between listing and stat
                    Err(e) if e.is_not_found() => continue,
                    Err(e) => return Err(e.into()),
                };
                found.insert(self.reference_for(&file, &root.directory), timestamp);
            }
        }
        Ok(found)
    }

    fn reference_for(&self, file: &Path, scan_root: &Path) -> String {
        let relative = devsync_fs::relative_to(file, &self.namespace_root)
            .or_else(|| devsync_fs::relative_to(file, scan_root))
            .unwrap_or_else(|| file.to_path_buf());
        format!("{}{}", self.tag, devsync_fs::to_slash_string(&relative))
    }
}

fn collect_files(directory: &Path, root: &ScanRoot, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = match fs::read_dir(directory) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(devsync_fs::Error::io(directory, e).into()),
    };

    for entry in entries {
        let entry = entry.map_err(|e| devsync_fs::Error::io(directory, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| devsync_fs::Error::io(&path, e))?;

        if file_type.is_dir() {
            if root.recursive {
                collect_files(&path, root, out)?;
            }
        } else if root.accepts(&path) {
            out.push(path);
        }
    }
    Ok(())
}
