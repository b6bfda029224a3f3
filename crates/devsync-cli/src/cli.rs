//! CLI argument parsing using clap derive
//!
//! Every option can also be supplied through the environment, which is how
//! the devcontainer configures the tool.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Parser, Subcommand};

use devsync_core::{ManagedLayout, PatchOptions, WatchOptions, parse_module_list};

/// devsync - Mirror a development workspace into a running Home Assistant
#[derive(Parser, Debug)]
#[command(name = "devsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub paths: PathArgs,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply change events read from stdin and restart after a quiet period
    ///
    /// Each input line is `<directory> <event> <file>`, as printed by
    /// `inotifywait -m -r --format '%w %e %f'`.
    Watch {
        #[command(flatten)]
        modules: ModuleArgs,

        #[command(flatten)]
        patch: PatchArgs,

        /// Restart the managed process once changes settle
        #[arg(
            long,
            env = "HASS_AUTO_RESTART",
            default_value_t = true,
            action = ArgAction::Set,
            value_parser = BoolishValueParser::new()
        )]
        auto_restart: bool,

        /// Quiet period in milliseconds before restarting
        #[arg(
            long,
            env = "DEVSYNC_QUIESCENCE_MS",
            default_value_t = 5000,
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        quiescence_ms: u64,

        /// Name of the process to signal on restart
        #[arg(long, env = "DEVSYNC_PROCESS", default_value = "hass")]
        process: String,
    },

    /// Reconcile the installed module resources once
    InstallModules {
        #[command(flatten)]
        modules: ModuleArgs,
    },

    /// Patch configuration.yaml with development defaults once
    UpdateConfig {
        #[command(flatten)]
        patch: PatchArgs,
    },
}

/// Locations of the managed configuration and the workspace
#[derive(Args, Debug, Clone)]
pub struct PathArgs {
    /// Configuration directory of the managed instance
    #[arg(long, env = "HASS_CONFIG_DIR", default_value = "/config", global = true)]
    pub config_dir: PathBuf,

    /// Development workspace root
    #[arg(long, env = "DEVSYNC_WORKSPACE", default_value = "/workspace", global = true)]
    pub workspace: PathBuf,
}

impl PathArgs {
    pub fn layout(&self) -> ManagedLayout {
        ManagedLayout::new(&self.config_dir, &self.workspace)
    }
}

/// External module references to keep installed
#[derive(Args, Debug, Clone)]
pub struct ModuleArgs {
    /// Semicolon-delimited module references, e.g. CDN URLs
    #[arg(long, env = "HASS_PLUGINS")]
    pub modules: Option<String>,
}

impl ModuleArgs {
    pub fn requested(&self) -> Option<BTreeSet<String>> {
        self.modules.as_deref().map(parse_module_list)
    }
}

/// Development defaults injected into configuration.yaml
#[derive(Args, Debug, Clone)]
pub struct PatchArgs {
    /// Semicolon-delimited reverse proxies to trust
    #[arg(long, env = "HASS_TRUSTED_PROXIES", default_value = "")]
    pub trusted_proxies: String,

    /// Trust the local proxy used by Codespaces
    #[arg(
        long,
        env = "CODESPACES",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub codespaces: bool,

    /// Allow every network to bypass the login screen
    #[arg(
        long,
        env = "HASS_BYPASS_LOGIN",
        default_value_t = false,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub bypass_login: bool,
}

impl PatchArgs {
    pub fn options(&self) -> PatchOptions {
        PatchOptions {
            codespaces: self.codespaces,
            bypass_login: self.bypass_login,
            ..Default::default()
        }
        .with_proxy_list(&self.trusted_proxies)
    }
}

/// Build watch options from the raw arguments.
pub fn watch_options(auto_restart: bool, quiescence_ms: u64) -> WatchOptions {
    WatchOptions {
        quiescence: Duration::from_millis(quiescence_ms),
        auto_restart,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_watch_defaults() {
        let cli = Cli::try_parse_from([
            "devsync",
            "--config-dir",
            "/tmp/config",
            "--workspace",
            "/tmp/ws",
            "watch",
        ])
        .unwrap();

        assert_eq!(cli.paths.config_dir, PathBuf::from("/tmp/config"));
        match cli.command {
            Commands::Watch {
                quiescence_ms,
                process,
                ..
            } => {
                assert_eq!(process, "hass");
                // Environment may override the default in CI; only check it parsed
                assert!(quiescence_ms > 0);
            }
            other => panic!("expected watch, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_boolish_flags() {
        let cli = Cli::try_parse_from([
            "devsync",
            "watch",
            "--auto-restart",
            "false",
            "--bypass-login",
            "yes",
            "--modules",
            "https://a/x.js;;https://a/y.js",
        ])
        .unwrap();

        let Commands::Watch {
            auto_restart,
            patch,
            modules,
            ..
        } = cli.command
        else {
            panic!("expected watch");
        };
        assert!(!auto_restart);
        assert!(patch.options().bypass_login);
        assert_eq!(modules.requested().map(|r| r.len()), Some(2));
    }

    #[test]
    fn test_zero_quiescence_rejected() {
        let result = Cli::try_parse_from(["devsync", "watch", "--quiescence-ms", "0"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["devsync", "watch", "--quiescence-ms", "1"]).unwrap();
        let Commands::Watch { quiescence_ms, .. } = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(quiescence_ms, 1);
    }

    #[test]
    fn test_global_paths_after_subcommand() {
        let cli = Cli::try_parse_from(["devsync", "update-config", "--config-dir", "/srv/ha"])
            .unwrap();
        assert_eq!(cli.paths.layout().config_dir(), std::path::Path::new("/srv/ha"));
    }
}
