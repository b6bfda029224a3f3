//! Synchronizer for mirroring workspace changes
//!
//! This module provides:
//! - **event**: parsing of `<directory> <flags> <file>` watcher records
//! - **engine**: applying one event and its post-action (`Synchronizer`)
//! - **watch**: the debounced loop that restarts after a quiet period
//! - **restart**: the `Restarter` seam and its `pkill` implementation

mod engine;
mod event;
mod restart;
mod watch;

pub use engine::Synchronizer;
pub use event::{ChangeEvent, EventKind};
pub use restart::{ProcessSignal, Restarter};
pub use watch::{DEFAULT_QUIESCENCE, WatchOptions, WatchSummary, watch};
