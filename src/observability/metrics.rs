//! Metrics collection and exposition.
//!
//! # Metrics
//! - `route_resolutions_total` (counter): resolutions by outcome
//! - `route_module_loads_total` (counter): physical loads by module, outcome
//! - `route_module_cache_hits_total` (counter): resolutions served from cache
//! - `route_module_load_duration_seconds` (histogram): load latency
//! - `route_modules_loaded` (gauge): modules currently cached
//! - `route_navigations_total` (counter): navigator outcomes

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::modules::ModuleKey;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_resolution(outcome: &'static str) {
    ::metrics::counter!("route_resolutions_total", "outcome" => outcome).increment(1);
}

pub fn record_module_load(module: &ModuleKey, outcome: &'static str, elapsed: Duration) {
    ::metrics::counter!(
        "route_module_loads_total",
        "module" => module.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!("route_module_load_duration_seconds", "module" => module.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_cache_hit(module: &ModuleKey) {
    ::metrics::counter!("route_module_cache_hits_total", "module" => module.to_string()).increment(1);
}

pub fn record_modules_loaded(count: usize) {
    ::metrics::gauge!("route_modules_loaded").set(count as f64);
}

pub fn record_navigation(outcome: &'static str) {
    ::metrics::counter!("route_navigations_total", "outcome" => outcome).increment(1);
}
