//! Command implementations for devsync-cli

pub mod config;
pub mod modules;
pub mod watch;

pub use config::run_update_config;
pub use modules::run_install_modules;
pub use watch::run_watch;
