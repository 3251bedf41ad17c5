//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML/JSON)
//!     → loader.rs (parse & deserialize)
//!     → defaults.rs (fill in missing settings)
//!     → BackendConfig (namespace → component → settings group)
//!     → reload.rs installs it as the active snapshot
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → reload.rs diffs it against the active snapshot (crate::diff)
//!     → atomic swap of Arc<BackendConfig>
//!     → GatewayChanges handed to the reconciler
//! ```
//!
//! # Design Decisions
//! - A loaded config is an immutable snapshot; changes require a reload
//! - The document has exactly three namespaces, each a map of flat groups
//! - Typed component configs are extracted on demand (extract.rs)

pub mod defaults;
pub mod extract;
pub mod loader;
pub mod namespace;
pub mod reload;
pub mod schema;
pub mod value;
pub mod watcher;

pub use extract::{ConfigExtractor, GatewayConfig, JsonExtractor};
pub use namespace::Namespace;
pub use reload::ActiveConfig;
pub use schema::BackendConfig;
pub use value::{ConfigGroup, ConfigValue};
