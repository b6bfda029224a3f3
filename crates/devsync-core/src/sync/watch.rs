//! Debounced apply-then-restart loop over the watcher stream

use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::timeout;

use crate::Result;

use super::engine::Synchronizer;
use super::event::ChangeEvent;
use super::restart::Restarter;

/// Default quiet period before a restart
pub const DEFAULT_QUIESCENCE: Duration = Duration::from_secs(5);

/// Options for [`watch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// How long the stream must stay silent before restarting
    pub quiescence: Duration,
    /// If false, changes are applied but the process is never restarted
    pub auto_restart: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            quiescence: DEFAULT_QUIESCENCE,
            auto_restart: true,
        }
    }
}

/// Counters reported when the stream ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchSummary {
    /// Events that matched a sync root and were applied
    pub applied: usize,
    /// Events outside every sync root
    pub ignored: usize,
    /// Restart requests issued
    pub restarts: usize,
}

/// Consume change events until `input` is exhausted.
///
/// Each event is fully applied, post-action included, before the next line
/// is read. Once an event has been applied the loop is dirty; when no line
/// arrives for `options.quiescence` while dirty, the managed process is
/// restarted (if enabled) and the loop becomes clean again. End of input
/// stops the loop without a final restart.
///
/// # Errors
///
/// Stops at the first malformed line, read failure or failed event.
pub async fn watch<R, T>(
    sync: &Synchronizer,
    input: R,
    restarter: &mut T,
    options: WatchOptions,
) -> Result<WatchSummary>
where
    R: AsyncBufRead + Unpin,
    T: Restarter + ?Sized,
{
    let mut lines = input.lines();
    let mut summary = WatchSummary::default();
    let mut dirty = false;

    loop {
        match timeout(options.quiescence, lines.next_line()).await {
            Ok(Ok(Some(line))) => {
                let event: ChangeEvent = line.parse()?;
                tracing::debug!(
                    directory = %event.directory.display(),
                    flags = %event.flags,
                    file = %event.file_name,
                    "Received event"
                );
                if sync.apply(&event)? {
                    summary.applied += 1;
                    dirty = true;
                } else {
                    summary.ignored += 1;
                }
            }
            Ok(Ok(None)) => break,
            Ok(Err(e)) => return Err(e.into()),
            Err(_elapsed) => {
                if dirty && options.auto_restart {
                    restarter.restart().await?;
                    summary.restarts += 1;
                }
                dirty = false;
            }
        }
    }

    tracing::info!(
        applied = summary.applied,
        ignored = summary.ignored,
        restarts = summary.restarts,
        "Event stream closed"
    );
    Ok(summary)
}
