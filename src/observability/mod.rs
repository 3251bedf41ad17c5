//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (reload counters, gateway change gauges)
//!
//! Consumers:
//!     → stdout (tracing-subscriber fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
