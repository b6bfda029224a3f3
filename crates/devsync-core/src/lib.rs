//! Workspace synchronization for a managed Home Assistant instance
//!
//! This crate mirrors a development workspace into the managed
//! configuration directory and keeps the installed frontend resources in
//! step with what is on disk:
//!
//! - **Resources**: load/save of the persisted resource list, discovery of
//!   local modules and reconciliation of both against requested references
//! - **Config**: idempotent patching of `configuration.yaml` that keeps
//!   custom-tagged nodes intact
//! - **Routing**: mapping a change event's directory onto a destination tree
//! - **Sync**: applying change events and restarting the managed process once
//!   the event stream has gone quiet
//!
//! # Architecture
//!
//! ```text
//!              devsync (CLI)
//!                   |
//!             devsync-core
//!     +-------+-----+------+--------+
//!     |       |            |        |
//!  resources config     routing    sync
//!     |       |                     |
//!     +-------+------ devsync-fs ---+
//! ```

pub mod config;
pub mod error;
pub mod layout;
pub mod resources;
pub mod routing;
pub mod sync;

pub use config::{ConfigPatcher, NodeKind, PatchOptions, PatchOutcome, TaggedNode};
pub use error::{Error, Result};
pub use layout::ManagedLayout;
pub use resources::{
    JsonResourceStore, ModuleInstaller, ModuleRecord, ModuleScanner, Provenance, ResourceMap,
    ResourceStore, ScanRoot, parse_module_list, reconcile, split_reference,
};
pub use routing::{PostAction, Route, Router, SyncRoot};
pub use sync::{
    ChangeEvent, EventKind, ProcessSignal, Restarter, Synchronizer, WatchOptions, WatchSummary,
    watch,
};
