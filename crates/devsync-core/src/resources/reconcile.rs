//! Merge of stored, discovered and requested module references

use std::collections::{BTreeMap, BTreeSet};

use super::{LOCAL_NAMESPACE, ResourceMap, split_reference};

/// Where a reference comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Derived from a file under the local namespace
    Local,
    /// Opaque external reference, e.g. a URL
    External,
}

impl Provenance {
    pub fn of(reference: &str) -> Self {
        if reference.starts_with(LOCAL_NAMESPACE) {
            Self::Local
        } else {
            Self::External
        }
    }
}

/// Reconcile the stored mapping against what is on disk and what is requested.
///
/// Requested references are matched the way the store reads them back: a
/// trailing `?t=<n>` is the record's timestamp, not part of the reference.
///
/// 1. Every discovered reference is added if missing and its timestamp is
///    overwritten; an existing identity is kept.
/// 2. References from `previous` that are neither discovered nor requested
///    are dropped, whatever their provenance. The stored list does not
///    record why an entry was added, so an external reference only survives
///    while it keeps being requested.
/// 3. Requested references that are still missing are added. A timestamp
///    carried by the request is applied to records that were not discovered.
///
/// Feeding the result back in with the same inputs returns it unchanged.
pub fn reconcile(
    previous: ResourceMap,
    discovered: &BTreeMap<String, u64>,
    requested: Option<&BTreeSet<String>>,
) -> ResourceMap {
    let requested: Option<BTreeMap<&str, Option<u64>>> =
        requested.map(|requested| requested.iter().map(|r| split_reference(r)).collect());
    let mut working = previous;

    for (reference, timestamp) in discovered {
        working.entry(reference.clone()).or_default().timestamp = Some(*timestamp);
    }

    working.retain(|reference, _| {
        let keep = discovered.contains_key(reference)
            || requested
                .as_ref()
                .is_some_and(|requested| requested.contains_key(reference.as_str()));
        if !keep {
            tracing::info!(
                reference,
                provenance = ?Provenance::of(reference),
                "Pruning module no longer present"
            );
        }
        keep
    });

    for (reference, timestamp) in requested.into_iter().flatten() {
        if discovered.contains_key(reference) {
            continue;
        }
        let record = working.entry(reference.to_string()).or_insert_with(|| {
            tracing::debug!(reference, "Adding requested module");
            Default::default()
        });
        if timestamp.is_some() {
            record.timestamp = timestamp;
        }
    }

    working
}
