//! Metrics collection and exposition.
//!
//! # Metrics
//! - `border_controller_ticks_total` (counter): ticks by outcome
//! - `border_controller_discovery_failures_total` (counter): by strategy
//! - `border_controller_backends` (gauge): backends in the last discovery
//! - `border_controller_config_installs_total` (counter)
//! - `border_controller_render_failures_total` (counter)
//! - `border_controller_proxy_actions_total` (counter): start/reload by action
//!
//! Recording is a no-op until `init_metrics` installs the exporter.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::supervisor::SupervisorAction;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_tick(outcome: &'static str) {
    ::metrics::counter!("border_controller_ticks_total", "outcome" => outcome).increment(1);
}

pub fn record_discovery_failure(strategy: &'static str) {
    ::metrics::counter!("border_controller_discovery_failures_total", "strategy" => strategy)
        .increment(1);
}

pub fn record_backends(count: usize) {
    ::metrics::gauge!("border_controller_backends").set(count as f64);
}

pub fn record_config_install() {
    ::metrics::counter!("border_controller_config_installs_total").increment(1);
}

pub fn record_render_failure() {
    ::metrics::counter!("border_controller_render_failures_total").increment(1);
}

pub fn record_proxy_action(action: SupervisorAction) {
    if action == SupervisorAction::None {
        return;
    }
    ::metrics::counter!("border_controller_proxy_actions_total", "action" => action.as_str())
        .increment(1);
}
