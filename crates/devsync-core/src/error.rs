//! Error types for devsync-core

/// Result type for devsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in devsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input line did not hold exactly `<directory> <event> <file>`
    #[error("Malformed event line (expected 3 fields, got {fields}): {line:?}")]
    MalformedEvent { line: String, fields: usize },

    /// The restart command could not be issued
    #[error("Failed to restart {process}: {message}")]
    RestartFailed { process: String, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from devsync-fs
    #[error(transparent)]
    Fs(#[from] devsync_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
