//! Change events read from the watcher stream

use std::path::PathBuf;
use std::str::FromStr;

use crate::Error;

/// Watcher flags that mean the file is gone from its directory
const DELETE_FLAGS: [&str; 3] = ["DELETE", "DELETE_SELF", "MOVED_FROM"];

/// What an event means for the destination tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Remove the destination path
    Delete,
    /// Copy the source over the destination path
    Upsert,
}

impl EventKind {
    /// Reduce a comma-joined flag list such as `CLOSE_WRITE,CLOSE`.
    pub fn from_flags(flags: &str) -> Self {
        if flags.split(',').any(|flag| DELETE_FLAGS.contains(&flag.trim())) {
            Self::Delete
        } else {
            Self::Upsert
        }
    }
}

/// One `<directory> <flags> <file>` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub directory: PathBuf,
    pub kind: EventKind,
    /// Flags as reported by the watcher
    pub flags: String,
    pub file_name: String,
}

impl FromStr for ChangeEvent {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [directory, flags, file_name] = fields.as_slice() else {
            return Err(Error::MalformedEvent {
                line: line.to_string(),
                fields: fields.len(),
            });
        };

        Ok(Self {
            directory: PathBuf::from(directory),
            kind: EventKind::from_flags(flags),
            flags: flags.to_string(),
            file_name: file_name.to_string(),
        })
    }
}
