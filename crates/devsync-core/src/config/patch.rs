//! Idempotent injection of development defaults into `configuration.yaml`

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Sequence, Value};

use super::tagged::collect_tagged;
use crate::Result;

/// Proxies trusted when running inside a Codespace
const CODESPACE_TRUSTED_PROXIES: [&str; 2] = ["127.0.0.1", "::1"];

/// Auth providers that let any network skip the login screen, falling back
/// to regular users
const BYPASS_LOGIN_PROVIDERS: &str = "\
- type: trusted_networks
  trusted_networks:
    - 0.0.0.0/0
    - ::/0
  allow_bypass_login: true
- type: homeassistant
";

/// Directories under the integrations root that are never integrations
const IGNORED_INTEGRATION_DIRS: [&str; 1] = ["__pycache__"];

/// Development defaults to inject
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchOptions {
    /// Reverse proxies to trust, as supplied by the user
    pub trusted_proxies: Vec<String>,
    /// Running inside a Codespace, which proxies through localhost
    pub codespaces: bool,
    /// Let every network bypass the login screen
    pub bypass_login: bool,
}

impl PatchOptions {
    /// Parse a semicolon-delimited proxy list.
    pub fn with_proxy_list(mut self, raw: &str) -> Self {
        self.trusted_proxies = raw.split(';').map(str::to_string).collect();
        self
    }

    /// Trimmed, non-empty, de-duplicated proxies including Codespace defaults.
    pub fn effective_proxies(&self) -> Vec<String> {
        let mut proxies: Vec<String> = Vec::new();
        let codespace = self
            .codespaces
            .then_some(CODESPACE_TRUSTED_PROXIES.as_slice())
            .unwrap_or_default();

        let candidates = self
            .trusted_proxies
            .iter()
            .map(|proxy| proxy.trim())
            .chain(codespace.iter().copied());
        for proxy in candidates {
            if !proxy.is_empty() && !proxies.iter().any(|p| p == proxy) {
                proxies.push(proxy.to_string());
            }
        }
        proxies
    }
}

/// Result of a patch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Document rewritten with the defaults applied
    Written,
    /// Defaults already present; nothing written
    Unchanged,
    /// Document missing or unparseable; left untouched
    Skipped { reason: String },
}

/// Patches one configuration document.
#[derive(Debug, Clone)]
pub struct ConfigPatcher {
    config_file: PathBuf,
    integrations_dir: PathBuf,
    options: PatchOptions,
}

impl ConfigPatcher {
    /// # Arguments
    ///
    /// * `config_file` - Path to `configuration.yaml`
    /// * `integrations_dir` - Workspace directory whose sub-directories are
    ///   local integrations to enable
    /// * `options` - Defaults to inject
    pub fn new(
        config_file: impl Into<PathBuf>,
        integrations_dir: impl Into<PathBuf>,
        options: PatchOptions,
    ) -> Self {
        Self {
            config_file: config_file.into(),
            integrations_dir: integrations_dir.into(),
            options,
        }
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Apply the defaults to the configuration document.
    ///
    /// A missing or unparseable document is skipped, never retried, and the
    /// file on disk is left as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read for reasons other
    /// than absence, or the patched document cannot be written.
    pub fn patch(&self) -> Result<PatchOutcome> {
        let source = match devsync_fs::read_text(&self.config_file) {
            Ok(source) => source,
            Err(e) if e.is_not_found() => {
                return Ok(self.skip("configuration document not found".to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let parsed = if source.trim().is_empty() {
            Ok(Value::Null)
        } else {
            serde_yaml::from_str(&source)
        };
        let mut document = match parsed {
            Ok(document) => document,
            Err(e) => return Ok(self.skip(format!("unparseable configuration document: {e}"))),
        };
        if document.is_null() {
            document = Value::Mapping(Mapping::new());
        }
        let tagged = collect_tagged(&document).len();
        let Value::Mapping(config) = &mut document else {
            return Ok(self.skip("configuration root is not a mapping".to_string()));
        };

        self.apply_trusted_proxies(config);
        self.apply_bypass_login(config)?;
        apply_default_logger(config);
        self.apply_local_integrations(config)?;

        let rendered = serde_yaml::to_string(&document)?;
        if rendered == source {
            tracing::debug!(path = %self.config_file.display(), "Configuration already patched");
            return Ok(PatchOutcome::Unchanged);
        }

        devsync_fs::write_text(&self.config_file, &rendered)?;
        tracing::info!(path = %self.config_file.display(), tagged, "Configuration updated");
        Ok(PatchOutcome::Written)
    }

    fn skip(&self, reason: String) -> PatchOutcome {
        tracing::warn!(path = %self.config_file.display(), %reason, "Skipping configuration patch");
        PatchOutcome::Skipped { reason }
    }

    fn apply_trusted_proxies(&self, config: &mut Mapping) {
        let proxies = self.options.effective_proxies();
        if proxies.is_empty() {
            return;
        }

        let Some(http) = ensure_mapping(config, "http") else {
            tracing::warn!("`http` is not a mapping, trusted proxies not configured");
            return;
        };
        http.insert("use_x_forwarded_for".into(), Value::Bool(true));

        let Some(trusted) = ensure_sequence(http, "trusted_proxies") else {
            tracing::warn!("`http.trusted_proxies` is not a list, trusted proxies not configured");
            return;
        };
        for proxy in proxies {
            let proxy = Value::String(proxy);
            if !trusted.contains(&proxy) {
                trusted.push(proxy);
            }
        }
    }

    fn apply_bypass_login(&self, config: &mut Mapping) -> Result<()> {
        if !self.options.bypass_login {
            return Ok(());
        }

        let Some(core) = ensure_mapping(config, "homeassistant") else {
            tracing::warn!("`homeassistant` is not a mapping, login bypass not configured");
            return Ok(());
        };
        if core.contains_key("auth_providers") {
            tracing::info!(
                "Bypass login is not enforced, the configuration already contains custom authentication providers"
            );
        } else {
            let providers: Value = serde_yaml::from_str(BYPASS_LOGIN_PROVIDERS)?;
            core.insert("auth_providers".into(), providers);
        }
        Ok(())
    }

    fn apply_local_integrations(&self, config: &mut Mapping) -> Result<()> {
        for domain in self.local_integrations()? {
            if !config.contains_key(domain.as_str()) {
                tracing::debug!(%domain, "Enabling local integration");
                config.insert(Value::String(domain), Value::Null);
            }
        }
        Ok(())
    }

    /// Names of the integration directories in the workspace, sorted.
    fn local_integrations(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.integrations_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(devsync_fs::Error::io(&self.integrations_dir, e).into()),
        };

        let mut domains = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| devsync_fs::Error::io(&self.integrations_dir, e))?
                .path();
            if !path.is_dir() {
                continue;
            }
            let Some(domain) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            if !IGNORED_INTEGRATION_DIRS.contains(&domain.as_str()) {
                domains.push(domain);
            }
        }
        domains.sort();
        Ok(domains)
    }
}

fn apply_default_logger(config: &mut Mapping) {
    if !config.contains_key("logger") {
        let mut logger = Mapping::new();
        logger.insert("default".into(), "info".into());
        config.insert("logger".into(), Value::Mapping(logger));
    }
}

/// Mapping stored under `key`, created when absent or null.
///
/// Returns `None` when the key holds something else, such as an
/// `!include` node.
fn ensure_mapping<'a>(parent: &'a mut Mapping, key: &str) -> Option<&'a mut Mapping> {
    let slot = parent.entry(key.into()).or_insert(Value::Null);
    if slot.is_null() {
        *slot = Value::Mapping(Mapping::new());
    }
    slot.as_mapping_mut()
}

fn ensure_sequence<'a>(parent: &'a mut Mapping, key: &str) -> Option<&'a mut Sequence> {
    let slot = parent.entry(key.into()).or_insert(Value::Null);
    if slot.is_null() {
        *slot = Value::Sequence(Sequence::new());
    }
    slot.as_sequence_mut()
}
