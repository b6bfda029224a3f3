//! Patching of the managed application's `configuration.yaml`
//!
//! The patcher injects development defaults (trusted proxies, login bypass,
//! logger, local integrations) without disturbing anything the user wrote.
//! Custom-tagged nodes such as `!include` or `!secret` are carried through as
//! tagged nodes and re-emitted with their original tag.

mod patch;
mod tagged;

pub use patch::{ConfigPatcher, PatchOptions, PatchOutcome};
pub use tagged::{NodeKind, TaggedNode, collect_tagged};
