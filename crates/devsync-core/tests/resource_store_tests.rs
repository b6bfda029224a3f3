//! Tests for the persisted resource list

use devsync_core::{
    JsonResourceStore, ModuleInstaller, ModuleRecord, ModuleScanner, ResourceMap, ResourceStore,
};
use std::collections::BTreeSet;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::fs;
use tempfile::tempdir;

fn store_in(dir: &std::path::Path) -> JsonResourceStore {
    JsonResourceStore::new(dir.join(".storage").join("lovelace_resources"))
}

#[test]
fn test_load_missing_document_is_empty() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());

    let resources = store.load().unwrap();

    assert!(resources.is_empty());
    assert!(!store.path().exists(), "load must not create the document");
}

#[test]
fn test_save_writes_application_document() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());

    let mut resources = ResourceMap::new();
    resources.insert(
        "local/workspace/a.js".to_string(),
        ModuleRecord::new("local-1", Some(1_700_000_000)),
    );
    resources.insert(
        "https://cdn.example/card.js".to_string(),
        ModuleRecord::new("ext-1", None),
    );
    store.save(&mut resources).unwrap();

    let content = fs::read_to_string(store.path()).unwrap();
    insta::assert_snapshot!(content, @r###"
{
    "version": 1,
    "minor_version": 1,
    "key": "lovelace_resources",
    "data": {
        "items": [
            {
                "id": "ext-1",
                "type": "module",
                "url": "https://cdn.example/card.js"
            },
            {
                "id": "local-1",
                "type": "module",
                "url": "local/workspace/a.js?t=1700000000"
            }
        ]
    }
}
"###);
}

#[test]
fn test_save_mints_missing_identities_once() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());

    let mut resources = ResourceMap::new();
    resources.insert("local/workspace/a.js".to_string(), ModuleRecord::default());
    store.save(&mut resources).unwrap();

    let minted = resources["local/workspace/a.js"].id.clone().unwrap();
    assert!(!minted.is_empty());

    // Saving again keeps the identity that is now on the record
    store.save(&mut resources).unwrap();
    let reloaded = store.load().unwrap();
    assert_eq!(reloaded["local/workspace/a.js"].id.as_deref(), Some(minted.as_str()));
}

#[test]
fn test_save_mints_distinct_identities() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());

    let mut resources = ResourceMap::new();
    resources.insert("local/workspace/a.js".to_string(), ModuleRecord::default());
    resources.insert("local/workspace/b.js".to_string(), ModuleRecord::default());
    store.save(&mut resources).unwrap();

    assert_ne!(
        resources["local/workspace/a.js"].id,
        resources["local/workspace/b.js"].id
    );
}

#[test]
fn test_load_reads_existing_document() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(
        store.path(),
        r#"{"version": 1, "minor_version": 1, "key": "lovelace_resources",
            "data": {"items": [
                {"id": "0", "type": "module", "url": "local/workspace/card.js?t=42"},
                {"id": "1", "type": "module", "url": "https://cdn.example/other.js"}
            ]}}"#,
    )
    .unwrap();

    let resources = store.load().unwrap();

    let mut expected = ResourceMap::new();
    expected.insert("local/workspace/card.js".to_string(), ModuleRecord::new("0", Some(42)));
    expected.insert("https://cdn.example/other.js".to_string(), ModuleRecord::new("1", None));
    assert_eq!(resources, expected);
}

#[test]
fn test_requested_reference_with_timestamp_keeps_identity_across_installs() {
    let dir = tempdir().unwrap();
    let requested: BTreeSet<String> = ["https://cdn.example/card.js?t=5".to_string()].into();
    let installer = || {
        ModuleInstaller::new(
            Box::new(store_in(dir.path())),
            ModuleScanner::new(dir.path().join("www")),
            Vec::new(),
        )
        .with_requested(Some(requested.clone()))
    };

    let first = installer().install().unwrap();
    let second = installer().install().unwrap();

    assert_eq!(second, first);
    assert_eq!(store_in(dir.path()).load().unwrap(), first);
    let record = &first["https://cdn.example/card.js"];
    assert_eq!(record.timestamp, Some(5));
    assert!(record.id.is_some());

    let content = fs::read_to_string(store_in(dir.path()).path()).unwrap();
    assert!(content.contains(r#""url": "https://cdn.example/card.js?t=5""#));
}

#[test]
fn test_load_corrupt_document_is_error() {
    let dir = tempdir().unwrap();
    let store = store_in(dir.path());
    fs::create_dir_all(store.path().parent().unwrap()).unwrap();
    fs::write(store.path(), "{ not json").unwrap();

    assert!(store.load().is_err());
}

fn record_strategy() -> impl Strategy<Value = ModuleRecord> {
    (
        proptest::option::of("[0-9a-f]{8}"),
        proptest::option::of(0u64..4_000_000_000),
    )
        .prop_map(|(id, timestamp)| ModuleRecord { id, timestamp })
}

proptest! {
    #[test]
    fn test_save_then_load_round_trips(
        resources in proptest::collection::btree_map(
            "(local/workspace/[a-z]{1,6}\\.m?js|https://cdn\\.example/[a-z]{1,6}\\.js)",
            record_strategy(),
            0..8,
        )
    ) {
        let dir = tempdir().unwrap();
        let store = store_in(dir.path());

        let mut saved = resources.clone();
        store.save(&mut saved).unwrap();
        let loaded = store.load().unwrap();

        // Equal to the input up to the identities minted on save
        prop_assert_eq!(&loaded, &saved);
        for (reference, record) in &resources {
            if let Some(id) = &record.id {
                prop_assert_eq!(loaded[reference].id.as_ref(), Some(id));
            }
            prop_assert_eq!(loaded[reference].timestamp, record.timestamp);
        }
    }
}
