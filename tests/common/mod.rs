//! Shared builders for integration tests.

use backend_config::{BackendConfig, Namespace};

/// Add a gateway with the given save and stream chains.
pub fn with_gateway(mut config: BackendConfig, name: &str, save: &str, stream: &str) -> BackendConfig {
    config.set_value(Namespace::Gateways, name, "save_process", save);
    config.set_value(Namespace::Gateways, name, "stream_save_process", stream);
    config
}

/// Set a single processor setting.
pub fn with_processor(mut config: BackendConfig, name: &str, key: &str, value: &str) -> BackendConfig {
    config.set_value(Namespace::Processors, name, key, value);
    config
}

/// Set a single stream processor setting.
#[allow(dead_code)]
pub fn with_stream_processor(mut config: BackendConfig, name: &str, key: &str, value: &str) -> BackendConfig {
    config.set_value(Namespace::StreamProcessors, name, key, value);
    config
}
