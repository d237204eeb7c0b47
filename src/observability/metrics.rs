//! Metrics collection and exposition.
//!
//! # Metrics
//! - `zipkin_requests_traced_total` (counter): requests that entered the middleware
//! - `zipkin_annotations_recorded_total` (counter): annotations handed to the recorder, by type
//! - `zipkin_annotations_dropped_total` (counter): annotations skipped (no context or
//!   unsampled), by type
//!
//! Updates are no-ops until a recorder such as the Prometheus exporter is
//! installed.

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

pub const REQUESTS_TRACED: &str = "zipkin_requests_traced_total";
pub const ANNOTATIONS_RECORDED: &str = "zipkin_annotations_recorded_total";
pub const ANNOTATIONS_DROPPED: &str = "zipkin_annotations_dropped_total";

/// Serve Prometheus metrics on `addr`. Must be called inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_request_traced() {
    counter!(REQUESTS_TRACED).increment(1);
}

pub fn record_annotation(kind: &'static str) {
    counter!(ANNOTATIONS_RECORDED, "annotation" => kind).increment(1);
}

pub fn record_annotation_dropped(kind: &'static str) {
    counter!(ANNOTATIONS_DROPPED, "annotation" => kind).increment(1);
}
