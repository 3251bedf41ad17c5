//! Configuration file watcher for hot reload.
//!
//! # Responsibilities
//! - Watch the config file for modify/create events
//! - Reload it (with defaults) on each event
//! - Forward only configs that differ from the last one forwarded
//!
//! # Design Decisions
//! - Editors often emit several events per save; identical reloads are
//!   dropped here so the diff and swap run once per real change
//! - A failed reload keeps the last good config and is not forwarded

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::BackendConfig;
use crate::observability::metrics;

/// Result of reloading the watched file once.
#[derive(Debug)]
pub enum ReloadOutcome {
    /// The file now holds a different configuration.
    Changed(BackendConfig),
    /// The file reloaded to the configuration last forwarded.
    Unchanged,
    Failed(ConfigError),
}

/// Remembers the last forwarded configuration and filters out repeats.
#[derive(Debug)]
pub struct ReloadFilter {
    path: PathBuf,
    last: BackendConfig,
}

impl ReloadFilter {
    /// `current` is the configuration already installed.
    pub fn new(path: &Path, current: BackendConfig) -> Self {
        Self {
            path: path.to_path_buf(),
            last: current,
        }
    }

    /// Reload the file and compare it with the last forwarded config.
    pub fn reload(&mut self) -> ReloadOutcome {
        match load_config(&self.path) {
            Ok(config) if config == self.last => ReloadOutcome::Unchanged,
            Ok(config) => {
                self.last = config.clone();
                ReloadOutcome::Changed(config)
            }
            Err(e) => ReloadOutcome::Failed(e),
        }
    }
}

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    filter: ReloadFilter,
    update_tx: mpsc::UnboundedSender<BackendConfig>,
}

impl ConfigWatcher {
    /// Create a watcher for `path`, whose contents are currently `current`.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(
        path: &Path,
        current: BackendConfig,
    ) -> (Self, mpsc::UnboundedReceiver<BackendConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let filter = ReloadFilter::new(path, current);
        (Self { filter, update_tx }, update_rx)
    }

    /// Start watching the file. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { mut filter, update_tx } = self;
        let path = filter.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    match filter.reload() {
                        ReloadOutcome::Changed(config) => {
                            tracing::info!(path = %filter.path.display(), "Config file changed, forwarding reload");
                            let _ = update_tx.send(config);
                        }
                        ReloadOutcome::Unchanged => {
                            tracing::debug!(path = %filter.path.display(), "Config file event without content change");
                        }
                        ReloadOutcome::Failed(e) => {
                            metrics::record_reload("failed");
                            tracing::error!(
                                "Failed to reload config: {}. Keeping current configuration.",
                                e
                            );
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}
