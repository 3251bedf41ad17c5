//! Typed views over generic settings groups.
//!
//! # Responsibilities
//! - Turn a component's `ConfigGroup` into a structured config type
//! - Report missing components and shape mismatches as errors

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::namespace::Namespace;
use crate::config::schema::BackendConfig;

/// Errors produced while extracting a typed config.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No settings group exists for the component.
    #[error("{namespace} component [{name}] is not configured")]
    MissingComponent { namespace: Namespace, name: String },

    /// The group does not fit the requested shape.
    #[error("{namespace} component [{name}] has invalid settings: {source}")]
    Shape {
        namespace: Namespace,
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Produces a structured view of one component's settings.
pub trait ConfigExtractor {
    fn extract<T: DeserializeOwned>(
        &self,
        ns: Namespace,
        name: &str,
        config: &BackendConfig,
    ) -> Result<T, ExtractError>;
}

/// Extracts by round-tripping the group through a JSON value.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExtractor;

impl ConfigExtractor for JsonExtractor {
    fn extract<T: DeserializeOwned>(
        &self,
        ns: Namespace,
        name: &str,
        config: &BackendConfig,
    ) -> Result<T, ExtractError> {
        let group = config
            .group(ns, name)
            .ok_or_else(|| ExtractError::MissingComponent {
                namespace: ns,
                name: name.to_string(),
            })?;

        let shape_error = |source: serde_json::Error| ExtractError::Shape {
            namespace: ns,
            name: name.to_string(),
            source,
        };
        let value = serde_json::to_value(group).map_err(shape_error)?;
        serde_json::from_value(value).map_err(shape_error)
    }
}

/// Gateway settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Number of workers handling save jobs.
    pub save_workers_size: usize,

    /// Processor chain run on each unit of work, outermost first.
    pub save_process: String,

    /// Stream processor chain run on streamed work, outermost first.
    pub stream_save_process: String,

    /// Timeout for a save job (e.g. "30s").
    pub save_timeout: String,

    /// Timeout for recipient validation (e.g. "3s").
    pub val_rcpt_timeout: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            save_workers_size: 1,
            save_process: String::new(),
            stream_save_process: String::new(),
            save_timeout: "30s".to_string(),
            val_rcpt_timeout: "5s".to_string(),
        }
    }
}

impl BackendConfig {
    /// Typed settings of a gateway, looked up case-insensitively.
    pub fn gateway_config(&self, name: &str) -> Result<GatewayConfig, ExtractError> {
        let wanted = name.to_lowercase();
        let stored = if self.gateways.contains_key(name) {
            name
        } else {
            self.gateways
                .keys()
                .find(|k| k.to_lowercase() == wanted)
                .map(String::as_str)
                .unwrap_or(name)
        };
        JsonExtractor.extract(Namespace::Gateways, stored, self)
    }
}

/// The two chain settings of a gateway, ignoring everything else.
///
/// Other gateway keys may hold any value without affecting this view.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct GatewayChains {
    pub save_process: String,
    pub stream_save_process: String,
}
