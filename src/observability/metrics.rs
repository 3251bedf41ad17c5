//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_reloads_total` (counter): reload attempts by outcome
//!   (`applied`, `unchanged`, `failed`)
//! - `config_gateways_changed` / `_added` / `_removed` / `_skipped` (gauge):
//!   size of each set from the last applied reload

use std::net::SocketAddr;

use crate::diff::GatewayChanges;

/// Install the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
    {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_reload(outcome: &'static str) {
    ::metrics::counter!("config_reloads_total", "outcome" => outcome).increment(1);
}

pub fn record_gateway_changes(changes: &GatewayChanges) {
    ::metrics::gauge!("config_gateways_changed").set(changes.changed.len() as f64);
    ::metrics::gauge!("config_gateways_added").set(changes.added.len() as f64);
    ::metrics::gauge!("config_gateways_removed").set(changes.removed.len() as f64);
    ::metrics::gauge!("config_gateways_skipped").set(changes.skipped.len() as f64);
}
