//! Restarting the managed process

use async_trait::async_trait;
use tokio::process::Command;

use crate::{Error, Result};

/// Requests a restart of the managed process.
///
/// Restarts are fire-and-forget: an external supervisor is expected to
/// bring the process back, nothing waits for it to come up.
#[async_trait]
pub trait Restarter: Send {
    async fn restart(&mut self) -> Result<()>;
}

/// Terminates the managed process by name with `pkill`.
#[derive(Debug, Clone)]
pub struct ProcessSignal {
    process: String,
}

impl ProcessSignal {
    pub fn new(process: impl Into<String>) -> Self {
        Self {
            process: process.into(),
        }
    }
}

#[async_trait]
impl Restarter for ProcessSignal {
    async fn restart(&mut self) -> Result<()> {
        tracing::info!(process = %self.process, "Restarting");

        let status = Command::new("pkill")
            .arg(&self.process)
            .status()
            .await
            .map_err(|e| Error::RestartFailed {
                process: self.process.clone(),
                message: e.to_string(),
            })?;

        if !status.success() {
            // pkill exits 1 when nothing matched; the supervisor may be mid-restart
            tracing::warn!(process = %self.process, %status, "Restart signal matched no process");
        }
        Ok(())
    }
}
