//! The installed configuration and hot reload.
//!
//! # Responsibilities
//! - Hold the active snapshot behind an atomic pointer
//! - Diff an incoming config against the active one before installing it
//! - Report affected gateways to the caller
//!
//! # Design Decisions
//! - Readers get an `Arc` snapshot; a reload never mutates it
//! - Reloads are expected from a single task (the watcher loop)

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::BackendConfig;
use crate::diff::GatewayChanges;
use crate::observability::metrics;

/// The configuration currently in effect.
#[derive(Debug)]
pub struct ActiveConfig {
    current: ArcSwap<BackendConfig>,
}

impl ActiveConfig {
    /// Install the initial configuration.
    pub fn new(initial: BackendConfig) -> Self {
        tracing::info!(
            gateways = initial.gateways.len(),
            processors = initial.processors.len(),
            stream_processors = initial.stream_processors.len(),
            "Installing initial configuration"
        );
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// Snapshot of the active configuration.
    pub fn load(&self) -> Arc<BackendConfig> {
        self.current.load_full()
    }

    /// Diff `new` against the active configuration, then install it.
    pub fn apply(&self, new: BackendConfig) -> GatewayChanges {
        let old = self.current.load_full();
        let changes = new.changes(&old);

        if new == *old {
            tracing::info!("Configuration unchanged, nothing to reload");
            metrics::record_reload("unchanged");
            return changes;
        }

        self.current.store(Arc::new(new));

        tracing::info!(
            changed = ?changes.changed,
            added = ?changes.added,
            removed = ?changes.removed,
            "Configuration reloaded"
        );
        if !changes.skipped.is_empty() {
            let skipped: Vec<&String> = changes.skipped.keys().collect();
            tracing::warn!(skipped = ?skipped, "Some gateways could not be inspected");
        }
        metrics::record_reload("applied");
        metrics::record_gateway_changes(&changes);
        changes
    }
}
