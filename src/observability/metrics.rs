//! Metrics collection and exposition.
//!
//! # Metrics
//! - `edge_requests_total` (counter): requests by method and status, every route
//! - `edge_request_duration_seconds` (histogram): latency distribution
//! - `edge_locale_redirects_total` (counter): redirects by locale and detection source
//! - `edge_rate_limited_total` (counter): denied form submissions by path
//! - `edge_contact_submissions_total` (counter): submissions by outcome (accepted, rejected, queue_full)
//! - `edge_sitemap_listing_failures_total` (counter): listing enumeration errors

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "edge_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("edge_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_locale_redirect(locale: &str, source: &str) {
    ::metrics::counter!(
        "edge_locale_redirects_total",
        "locale" => locale.to_string(),
        "source" => source.to_string()
    )
    .increment(1);
}

pub fn record_rate_limited(path: &str) {
    ::metrics::counter!("edge_rate_limited_total", "path" => path.to_string()).increment(1);
}

pub fn record_contact_submission(outcome: &'static str) {
    ::metrics::counter!("edge_contact_submissions_total", "outcome" => outcome).increment(1);
}

pub fn record_sitemap_listing_failure() {
    ::metrics::counter!("edge_sitemap_listing_failures_total").increment(1);
}
