//! Configuration schema and store.
//!
//! The backend configuration is a three-level mapping:
//! namespace → component name → flat settings group. Component names keep the
//! case they were written with; only the diff engine folds them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::namespace::Namespace;
use crate::config::value::{ConfigGroup, ConfigValue};

/// Settings groups of one namespace, keyed by component name.
pub type ComponentMap = BTreeMap<String, ConfigGroup>;

/// Root configuration for the backend.
///
/// The persisted form has exactly the three namespace keys at the top level.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Processing stages.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub processors: ComponentMap,

    /// Streaming processing stages.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub stream_processors: ComponentMap,

    /// Delivery endpoints.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub gateways: ComponentMap,
}

impl BackendConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// All components of a namespace.
    pub fn components(&self, ns: Namespace) -> &ComponentMap {
        match ns {
            Namespace::Processors => &self.processors,
            Namespace::StreamProcessors => &self.stream_processors,
            Namespace::Gateways => &self.gateways,
        }
    }

    pub fn components_mut(&mut self, ns: Namespace) -> &mut ComponentMap {
        match ns {
            Namespace::Processors => &mut self.processors,
            Namespace::StreamProcessors => &mut self.stream_processors,
            Namespace::Gateways => &mut self.gateways,
        }
    }

    /// The settings group of a single component, if configured.
    pub fn group(&self, ns: Namespace, name: &str) -> Option<&ConfigGroup> {
        self.components(ns).get(name)
    }

    /// Store `value` under `key`, creating the component entry if needed.
    pub fn set_value(
        &mut self,
        ns: Namespace,
        name: &str,
        key: &str,
        value: impl Into<ConfigValue>,
    ) {
        self.components_mut(ns)
            .entry(name.to_string())
            .or_default()
            .insert(key.to_string(), value.into());
    }

    /// Look up a value; `None` if the component or key is missing.
    pub fn get_value(&self, ns: Namespace, name: &str, key: &str) -> Option<&ConfigValue> {
        self.group(ns, name).and_then(|g| g.get(key))
    }
}
