//! Change detection subsystem.
//!
//! # Data Flow
//! ```text
//! (old BackendConfig, new BackendConfig)
//!     → group.rs (changed/added/removed per processor namespace)
//!     → changes.rs (walk new gateways, parse chains, propagate)
//!     → GatewayChanges {changed, added, removed, skipped}
//!     → reconciler restarts or reconfigures only those gateways
//! ```
//!
//! # Design Decisions
//! - Pure function of two snapshots; neither snapshot is mutated
//! - Processor adds/removes count as changes for propagation
//! - Extraction failures are reported per gateway, never abort the diff

pub mod changes;
pub mod group;

pub use changes::GatewayChanges;
pub use group::{changed_config_groups, compare_config_groups, GroupDiff};
