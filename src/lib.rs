//! Hot-reload configuration model and change detector for gateway backends.

pub mod chain;
pub mod config;
pub mod diff;
pub mod observability;

pub use chain::StackConfig;
pub use config::{ActiveConfig, BackendConfig, Namespace};
pub use diff::GatewayChanges;
