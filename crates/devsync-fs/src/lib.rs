//! Filesystem primitives for devsync
//!
//! Provides atomic whole-file writes, idempotent removal and the path
//! helpers the synchronizer uses to map workspace trees onto the managed
//! configuration directory.

pub mod error;
pub mod io;
pub mod path;

pub use error::{Error, Result};
pub use io::{copy_atomic, modified_secs, read_text, remove_path, write_atomic, write_text};
pub use path::{is_within, relative_to, to_slash_string};
