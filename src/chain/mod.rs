//! Processor chain subsystem.
//!
//! # Data Flow
//! ```text
//! gateway settings (save_process / stream_save_process)
//!     → stack.rs (trim, lowercase, split on '|', reverse)
//!     → StackConfig (links in execution order + bound not-found factory)
//!     → consumers: diff engine (membership), resolver (lookup installed)
//! ```

pub mod stack;

pub use stack::{ResolutionError, StackConfig, StackConfigExpression};
