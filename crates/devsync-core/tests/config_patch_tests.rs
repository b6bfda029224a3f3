//! Tests for patching configuration.yaml

use devsync_core::config::collect_tagged;
use devsync_core::{ConfigPatcher, NodeKind, PatchOptions, PatchOutcome};
use pretty_assertions::assert_eq;
use serde_yaml::Value;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

const USER_CONFIG: &str = "\
default_config:
automation: !include automations.yaml
homeassistant:
  name: Dev
  customize: !include customize.yaml
api_key: !secret api_key
sensor: !include_dir_merge_list sensors/
";

struct Fixture {
    _dir: TempDir,
    config_file: std::path::PathBuf,
    integrations: std::path::PathBuf,
}

fn fixture(config: &str) -> Fixture {
    let dir = tempdir().unwrap();
    let config_file = dir.path().join("config").join("configuration.yaml");
    fs::create_dir_all(config_file.parent().unwrap()).unwrap();
    fs::write(&config_file, config).unwrap();
    let integrations = dir.path().join("workspace").join("custom_components");
    Fixture {
        _dir: dir,
        config_file,
        integrations,
    }
}

fn load(path: &Path) -> Value {
    serde_yaml::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_patch_adds_default_logger_and_keeps_tags() {
    let fx = fixture(USER_CONFIG);
    let patcher = ConfigPatcher::new(&fx.config_file, &fx.integrations, PatchOptions::default());

    assert_eq!(patcher.patch().unwrap(), PatchOutcome::Written);

    let written = fs::read_to_string(&fx.config_file).unwrap();
    assert!(written.contains("automation: !include automations.yaml"), "{}", written);
    assert!(written.contains("api_key: !secret api_key"), "{}", written);
    assert!(written.contains("customize: !include customize.yaml"), "{}", written);

    let before: Value = serde_yaml::from_str(USER_CONFIG).unwrap();
    let after = load(&fx.config_file);
    assert_eq!(collect_tagged(&after), collect_tagged(&before));
    assert_eq!(after["logger"]["default"], Value::from("info"));
}

#[test]
fn test_patch_keeps_tagged_mappings_and_sequences() {
    let source = "\
group: !custom_group
  kitchen: light.a
sensor: !include_dir_list
  - a
";
    let fx = fixture(source);
    let patcher = ConfigPatcher::new(&fx.config_file, &fx.integrations, PatchOptions::default());

    assert_eq!(patcher.patch().unwrap(), PatchOutcome::Written);

    let written = fs::read_to_string(&fx.config_file).unwrap();
    assert!(written.contains("group: !custom_group"), "{}", written);
    assert!(written.contains("sensor: !include_dir_list"), "{}", written);

    let kinds: Vec<_> = collect_tagged(&load(&fx.config_file))
        .into_iter()
        .map(|node| (node.tag, node.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("!custom_group".to_string(), NodeKind::Mapping),
            ("!include_dir_list".to_string(), NodeKind::Sequence),
        ]
    );
}

#[test]
fn test_patch_is_idempotent() {
    let fx = fixture(USER_CONFIG);
    let options = PatchOptions {
        bypass_login: true,
        codespaces: true,
        ..Default::default()
    }
    .with_proxy_list("172.30.33.0/24");
    fs::create_dir_all(fx.integrations.join("demo")).unwrap();
    let patcher = ConfigPatcher::new(&fx.config_file, &fx.integrations, options);

    assert_eq!(patcher.patch().unwrap(), PatchOutcome::Written);
    let first = fs::read_to_string(&fx.config_file).unwrap();

    assert_eq!(patcher.patch().unwrap(), PatchOutcome::Unchanged);
    let second = fs::read_to_string(&fx.config_file).unwrap();

    assert_eq!(first, second);
    let proxies = load(&fx.config_file)["http"]["trusted_proxies"].clone();
    assert_eq!(
        proxies,
        serde_yaml::from_str::<Value>("[172.30.33.0/24, 127.0.0.1, '::1']").unwrap()
    );
}

#[test]
fn test_patch_keeps_existing_logger() {
    let fx = fixture("logger:\n  default: warning\n");
    let patcher = ConfigPatcher::new(&fx.config_file, &fx.integrations, PatchOptions::default());

    assert_eq!(patcher.patch().unwrap(), PatchOutcome::Unchanged);
    assert_eq!(load(&fx.config_file)["logger"]["default"], Value::from("warning"));
}

#[test]
fn test_patch_trusted_proxies_extend_existing_list() {
    let fx = fixture("http:\n  trusted_proxies:\n    - 10.0.0.1\n");
    let options = PatchOptions::default().with_proxy_list("10.0.0.1;10.0.0.2");
    let patcher = ConfigPatcher::new(&fx.config_file, &fx.integrations, options);

    patcher.patch().unwrap();

    let config = load(&fx.config_file);
    assert_eq!(config["http"]["use_x_forwarded_for"], Value::Bool(true));
    assert_eq!(
        config["http"]["trusted_proxies"],
        serde_yaml::from_str::<Value>("[10.0.0.1, 10.0.0.2]").unwrap()
    );
}

#[test]
fn test_patch_bypass_login_injects_providers() {
    let fx = fixture("homeassistant:\n  name: Dev\n");
    let options = PatchOptions {
        bypass_login: true,
        ..Default::default()
    };
    let patcher = ConfigPatcher::new(&fx.config_file, &fx.integrations, options);

    patcher.patch().unwrap();

    let config = load(&fx.config_file);
    let providers = config["homeassistant"]["auth_providers"].as_sequence().unwrap();
    assert_eq!(providers.len(), 2);
    assert_eq!(providers[0]["type"], Value::from("trusted_networks"));
    assert_eq!(providers[0]["allow_bypass_login"], Value::Bool(true));
    assert_eq!(providers[1]["type"], Value::from("homeassistant"));
    assert_eq!(config["homeassistant"]["name"], Value::from("Dev"));
}

#[test]
fn test_patch_bypass_login_respects_custom_providers() {
    let config = "homeassistant:\n  auth_providers:\n  - type: homeassistant\nlogger:\n  default: info\n";
    let fx = fixture(config);
    let options = PatchOptions {
        bypass_login: true,
        ..Default::default()
    };
    let patcher = ConfigPatcher::new(&fx.config_file, &fx.integrations, options);

    patcher.patch().unwrap();

    let providers = load(&fx.config_file)["homeassistant"]["auth_providers"].clone();
    assert_eq!(providers.as_sequence().unwrap().len(), 1);
}

#[test]
fn test_patch_enables_local_integrations_once() {
    let fx = fixture("my_integration:\n  option: 1\n");
    fs::create_dir_all(fx.integrations.join("my_integration")).unwrap();
    fs::create_dir_all(fx.integrations.join("other_integration")).unwrap();
    fs::create_dir_all(fx.integrations.join("__pycache__")).unwrap();
    fs::write(fx.integrations.join("README.md"), "").unwrap();
    let patcher = ConfigPatcher::new(&fx.config_file, &fx.integrations, PatchOptions::default());

    patcher.patch().unwrap();

    let config = load(&fx.config_file);
    assert_eq!(config["my_integration"]["option"], Value::from(1));
    assert_eq!(config.get("other_integration"), Some(&Value::Null));
    assert!(config.get("__pycache__").is_none());
    assert!(config.get("README").is_none());
}

#[test]
fn test_patch_malformed_document_is_left_untouched() {
    let broken = "homeassistant:\n  name: [unclosed\n";
    let fx = fixture(broken);
    let patcher = ConfigPatcher::new(&fx.config_file, &fx.integrations, PatchOptions::default());

    let outcome = patcher.patch().unwrap();

    assert!(matches!(outcome, PatchOutcome::Skipped { .. }), "{:?}", outcome);
    assert_eq!(fs::read_to_string(&fx.config_file).unwrap(), broken);
}

#[test]
fn test_patch_missing_document_is_skipped() {
    let dir = tempdir().unwrap();
    let config_file = dir.path().join("configuration.yaml");
    let patcher = ConfigPatcher::new(&config_file, dir.path().join("none"), PatchOptions::default());

    let outcome = patcher.patch().unwrap();

    assert!(matches!(outcome, PatchOutcome::Skipped { .. }));
    assert!(!config_file.exists());
}

#[test]
fn test_patch_empty_document_gets_defaults() {
    let fx = fixture("");
    let patcher = ConfigPatcher::new(&fx.config_file, &fx.integrations, PatchOptions::default());

    assert_eq!(patcher.patch().unwrap(), PatchOutcome::Written);
    assert_eq!(load(&fx.config_file)["logger"]["default"], Value::from("info"));
}
