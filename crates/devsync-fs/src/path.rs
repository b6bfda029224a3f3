//! Path helpers for mapping files between directory trees

use std::path::{Component, Path, PathBuf};

/// Whether `path` equals `root` or lies below it.
///
/// Matching is done on whole path components, so `/workspace/dist2` is not
/// within `/workspace/dist`.
pub fn is_within(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

/// Path of `path` relative to `root`, or `None` if it lies outside.
pub fn relative_to(path: &Path, root: &Path) -> Option<PathBuf> {
    path.strip_prefix(root).ok().map(Path::to_path_buf)
}

/// Render a relative path with forward slashes regardless of platform.
///
/// Only normal components are kept; `.` and root markers are dropped.
pub fn to_slash_string(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
