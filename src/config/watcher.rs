use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const DEBOUNCE: Duration = Duration::from_millis(300);

/// Reports writes to a single config file. Editors often replace the file instead of
/// writing it in place, so the parent directory is watched and events are filtered by name.
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    changes: mpsc::Receiver<PathBuf>,
}

impl ConfigWatcher {
    pub fn spawn(path: &Path) -> Result<Self> {
        let file_name: OsString = path
            .file_name()
            .with_context(|| format!("config path {} has no file name", path.display()))?
            .to_owned();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (sender, changes) = mpsc::channel(16);
        let mut watcher = RecommendedWatcher::new(
            move |result: notify::Result<Event>| match result {
                Ok(event) => {
                    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        return;
                    }
                    for changed in event.paths {
                        if changed.file_name() == Some(file_name.as_os_str()) {
                            // A full channel already has a pending reload queued.
                            let _ = sender.try_send(changed);
                        }
                    }
                }
                Err(error) => warn!(%error, "config watch error"),
            },
            Config::default(),
        )
        .context("failed to create config watcher")?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("failed to watch {}", dir.display()))?;
        info!(path = %path.display(), "watching config for changes");

        Ok(Self {
            _watcher: watcher,
            changes,
        })
    }

    /// Waits for the next change, collapsing the burst of events a single save produces.
    /// Returns `None` once the watcher has stopped.
    pub async fn changed(&mut self) -> Option<PathBuf> {
        let path = self.changes.recv().await?;

        tokio::time::sleep(DEBOUNCE).await;
        let mut collapsed = 0;
        while self.changes.try_recv().is_ok() {
            collapsed += 1;
        }
        debug!(path = %path.display(), collapsed, "config change detected");

        Some(path)
    }
}
