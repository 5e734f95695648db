//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define dispatcher metrics (dispatches, latency, preflights)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatches by method, status
//! - `router_dispatch_duration_seconds` (histogram): latency by method
//! - `router_preflight_total` (counter): answered CORS preflights
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels are low-cardinality only (no paths)

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

pub const DISPATCH_TOTAL: &str = "router_dispatch_total";
pub const DISPATCH_DURATION: &str = "router_dispatch_duration_seconds";
pub const PREFLIGHT_TOTAL: &str = "router_preflight_total";

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!(address = %addr, "Prometheus exporter listening");
    Ok(())
}

/// Record one completed dispatch.
pub fn record_dispatch(method: &str, status: u16, start: Instant) {
    let method = method.to_string();
    counter!(DISPATCH_TOTAL, "method" => method.clone(), "status" => status.to_string())
        .increment(1);
    histogram!(DISPATCH_DURATION, "method" => method).record(start.elapsed().as_secs_f64());
}

/// Record one answered preflight.
pub fn record_preflight() {
    counter!(PREFLIGHT_TOTAL).increment(1);
}
