//! Metrics collection and exposition.
//!
//! # Metrics
//! - `page_requests_total` (counter): entry point calls by `entry`, `outcome`
//! - `cms_query_duration_seconds` (histogram): content backend latency
//! - `cms_query_errors_total` (counter): failed content backend queries

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// One call to a page entry point (`render` or `metadata`).
pub fn record_page_request(entry: &'static str, outcome: &'static str) {
    counter!("page_requests_total", "entry" => entry, "outcome" => outcome).increment(1);
}

/// One content backend query.
pub fn record_cms_query(start: Instant, ok: bool) {
    histogram!("cms_query_duration_seconds").record(start.elapsed().as_secs_f64());
    if !ok {
        counter!("cms_query_errors_total").increment(1);
    }
}
