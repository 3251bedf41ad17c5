//! Gateway change detection.
//!
//! # Responsibilities
//! - Diff the processor and stream processor namespaces
//! - Mark gateways whose chains reference a changed component
//! - Mark gateways whose own settings changed, appeared or disappeared
//!
//! # Design Decisions
//! - Gateway names are matched case-insensitively and reported lowercase;
//!   renaming a gateway only by case is a settings comparison
//! - Added and removed gateways are reported only as such; chains are
//!   checked for gateways present in both configurations
//! - Only the two chain settings are extracted; other gateway keys never
//!   block propagation
//! - A gateway whose chains cannot be extracted is reported in `skipped`
//!   and gets no chain propagation; its own settings are still compared

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::chain::StackConfig;
use crate::config::extract::{ConfigExtractor, GatewayChains, JsonExtractor};
use crate::config::namespace::Namespace;
use crate::config::schema::BackendConfig;
use crate::config::value::ConfigGroup;
use crate::diff::group::changed_config_groups;

/// Gateways affected by moving from one configuration to another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GatewayChanges {
    /// Own settings differ, or a referenced processor changed.
    pub changed: BTreeSet<String>,
    /// Present only in the new configuration.
    pub added: BTreeSet<String>,
    /// Present only in the old configuration.
    pub removed: BTreeSet<String>,
    /// Gateways whose chains could not be inspected, with the reason.
    pub skipped: BTreeMap<String, String>,
}

impl GatewayChanges {
    /// True if no gateway needs attention.
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }

    /// Every gateway that must be reconfigured, started or stopped.
    pub fn affected(&self) -> BTreeSet<&str> {
        self.changed
            .iter()
            .chain(&self.added)
            .chain(&self.removed)
            .map(String::as_str)
            .collect()
    }
}

impl BackendConfig {
    /// Gateways affected by replacing `old` with `self`.
    pub fn changes(&self, old: &BackendConfig) -> GatewayChanges {
        self.changes_with(old, &JsonExtractor)
    }

    /// Like [`BackendConfig::changes`], with a custom extractor.
    pub fn changes_with<E: ConfigExtractor>(&self, old: &BackendConfig, extractor: &E) -> GatewayChanges {
        let changed_processors = changed_config_groups(&old.processors, &self.processors);
        let changed_stream_processors =
            changed_config_groups(&old.stream_processors, &self.stream_processors);

        tracing::debug!(
            processors = ?changed_processors,
            stream_processors = ?changed_stream_processors,
            "Computed changed processor sets"
        );

        let mut changes = GatewayChanges::default();
        // Old gateways keyed by lowercased name; entries left after walking
        // the new config were removed.
        let mut old_gateways: BTreeMap<String, &ConfigGroup> = old
            .gateways
            .iter()
            .map(|(name, group)| (name.to_lowercase(), group))
            .collect();

        for (name, group) in &self.gateways {
            let key = name.to_lowercase();

            let Some(previous) = old_gateways.remove(&key) else {
                changes.added.insert(key);
                continue;
            };
            if previous != group {
                changes.changed.insert(key.clone());
            }

            match extractor.extract::<GatewayChains>(Namespace::Gateways, name, self) {
                Ok(chains) => {
                    let save = StackConfig::processors(&chains.save_process);
                    let stream = StackConfig::stream_processors(&chains.stream_save_process);
                    let uses_changed = save.names().any(|n| changed_processors.contains(n))
                        || stream.names().any(|n| changed_stream_processors.contains(n));
                    if uses_changed {
                        tracing::debug!(gateway = %name, "Gateway references a changed processor");
                        changes.changed.insert(key);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        gateway = %name,
                        error = %e,
                        "Skipping chain check for gateway with unreadable settings"
                    );
                    changes.skipped.insert(key, e.to_string());
                }
            }
        }

        changes.removed = old_gateways.into_keys().collect();
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::extract::ExtractError;
    use serde::de::DeserializeOwned;

    fn gateway(config: &mut BackendConfig, name: &str, save: &str, stream: &str) {
        config.set_value(Namespace::Gateways, name, "save_process", save);
        config.set_value(Namespace::Gateways, name, "stream_save_process", stream);
    }

    fn base() -> BackendConfig {
        let mut config = BackendConfig::new();
        gateway(&mut config, "default", "HeadersParser|Header", "");
        gateway(&mut config, "outbound", "Debugger", "Decompress|Hasher");
        config.set_value(Namespace::Processors, "Header", "primary_mail_host", "a");
        config.set_value(Namespace::Processors, "Debugger", "log_received_mails", true);
        config.set_value(Namespace::StreamProcessors, "Hasher", "algorithm", "sha256");
        config
    }

    #[test]
    fn test_no_changes() {
        let old = base();
        let changes = base().changes(&old);
        assert!(changes.is_empty());
        assert!(changes.skipped.is_empty());
    }

    #[test]
    fn test_processor_change_propagates() {
        let old = base();
        let mut new = base();
        new.set_value(Namespace::Processors, "Header", "primary_mail_host", "b");

        let changes = new.changes(&old);
        assert_eq!(changes.changed, BTreeSet::from(["default".to_string()]));
        assert!(changes.added.is_empty());
        assert!(changes.removed.is_empty());
    }

    #[test]
    fn test_stream_processor_change_propagates() {
        let old = base();
        let mut new = base();
        new.set_value(Namespace::StreamProcessors, "Hasher", "algorithm", "md5");

        let changes = new.changes(&old);
        assert_eq!(changes.changed, BTreeSet::from(["outbound".to_string()]));
    }

    #[test]
    fn test_namespaces_not_crossed() {
        // A processor named like a stream link does not affect the stream chain
        let old = base();
        let mut new = base();
        new.set_value(Namespace::Processors, "Hasher", "algorithm", "md5");

        assert!(new.changes(&old).is_empty());
    }

    #[test]
    fn test_added_processor_propagates() {
        let mut old = base();
        old.processors.remove("Debugger");
        let new = base();

        let changes = new.changes(&old);
        assert_eq!(changes.changed, BTreeSet::from(["outbound".to_string()]));
    }

    #[test]
    fn test_own_settings_change() {
        let old = base();
        let mut new = base();
        new.set_value(Namespace::Gateways, "outbound", "save_workers_size", 4);

        let changes = new.changes(&old);
        assert_eq!(changes.changed, BTreeSet::from(["outbound".to_string()]));
    }

    #[test]
    fn test_added_and_removed_gateways() {
        let old = base();
        let mut new = base();
        new.gateways.remove("outbound");
        gateway(&mut new, "Relay", "Header", "");
        new.set_value(Namespace::Processors, "Header", "primary_mail_host", "b");

        let changes = new.changes(&old);
        assert_eq!(changes.added, BTreeSet::from(["relay".to_string()]));
        assert_eq!(changes.removed, BTreeSet::from(["outbound".to_string()]));
        // Relay references the changed Header but is only reported as added
        assert_eq!(changes.changed, BTreeSet::from(["default".to_string()]));
    }

    #[test]
    fn test_unreadable_gateway_is_skipped_not_removed() {
        let old = base();
        let mut new = base();
        new.set_value(Namespace::Gateways, "default", "save_process", 7);

        let changes = new.changes(&old);
        assert!(changes.skipped.contains_key("default"));
        assert!(changes.changed.contains("default"));
        assert!(changes.removed.is_empty());
    }

    struct FailingExtractor;

    impl ConfigExtractor for FailingExtractor {
        fn extract<T: DeserializeOwned>(
            &self,
            ns: Namespace,
            name: &str,
            _config: &BackendConfig,
        ) -> Result<T, ExtractError> {
            Err(ExtractError::MissingComponent { namespace: ns, name: name.to_string() })
        }
    }

    #[test]
    fn test_extraction_failure_does_not_abort() {
        let old = base();
        let mut new = base();
        new.set_value(Namespace::Processors, "Header", "primary_mail_host", "b");
        gateway(&mut new, "extra", "", "");

        let changes = new.changes_with(&old, &FailingExtractor);
        assert_eq!(
            changes.skipped.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["default", "outbound"]
        );
        // No chain propagation without extraction
        assert!(changes.changed.is_empty());
        assert_eq!(changes.added, BTreeSet::from(["extra".to_string()]));
    }

    #[test]
    fn test_affected() {
        let old = base();
        let mut new = base();
        new.gateways.remove("outbound");
        gateway(&mut new, "relay", "", "");
        new.set_value(Namespace::Gateways, "default", "save_workers_size", 2);

        let changes = new.changes(&old);
        assert_eq!(
            changes.affected(),
            BTreeSet::from(["default", "outbound", "relay"])
        );
    }

    #[test]
    fn test_numeric_timeout_does_not_block_propagation() {
        let mut old = BackendConfig::new();
        gateway(&mut old, "g", "A|B", "");
        old.set_value(Namespace::Gateways, "g", "save_timeout", 30);
        old.set_value(Namespace::Processors, "B", "k", "1");
        let mut new = old.clone();
        new.set_value(Namespace::Processors, "B", "k", "2");

        let changes = new.changes(&old);
        assert_eq!(changes.changed, BTreeSet::from(["g".to_string()]));
        assert!(changes.skipped.is_empty());
    }

    #[test]
    fn test_case_only_rename_is_not_add_remove() {
        let mut old = BackendConfig::new();
        gateway(&mut old, "Relay", "Header", "");
        let mut new = BackendConfig::new();
        gateway(&mut new, "relay", "Header", "");

        let changes = new.changes(&old);
        assert!(changes.added.is_empty());
        assert!(changes.removed.is_empty());
        assert!(changes.changed.is_empty());

        // A settings change under the new spelling is reported as changed
        new.set_value(Namespace::Gateways, "relay", "save_workers_size", 2);
        let changes = new.changes(&old);
        assert_eq!(changes.changed, BTreeSet::from(["relay".to_string()]));
        assert!(changes.added.is_disjoint(&changes.removed));
    }
}
