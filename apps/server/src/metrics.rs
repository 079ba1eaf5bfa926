//! Metrics collection for the marketplace server
//!
//! Prometheus metrics for HTTP traffic and the listing search pipeline,
//! exposed on `/metrics`.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};

lazy_static! {
    // HTTP Request Metrics

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "wasteless_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "wasteless_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    /// In-flight HTTP requests
    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "wasteless_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");

    /// HTTP response size in bytes
    pub static ref HTTP_RESPONSE_SIZE_BYTES: HistogramVec = register_histogram_vec!(
        "wasteless_http_response_size_bytes",
        "HTTP response size in bytes",
        &["method", "path", "status"],
        vec![100.0, 1_000.0, 10_000.0, 100_000.0, 1_000_000.0, 10_000_000.0]
    )
    .expect("Failed to register HTTP_RESPONSE_SIZE_BYTES");

    // Search Metrics

    /// Searches by kind (`listings`, `business_listings`, `cards`) and outcome
    pub static ref SEARCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        "wasteless_search_total",
        "Total number of search operations",
        &["kind", "status"]
    )
    .expect("Failed to register SEARCH_TOTAL");

    /// Matches per search, ignoring pagination
    pub static ref SEARCH_MATCHES: HistogramVec = register_histogram_vec!(
        "wasteless_search_matches",
        "Number of rows matched by a search",
        &["kind"],
        vec![0.0, 1.0, 10.0, 50.0, 100.0, 500.0, 1000.0, 5000.0, 10000.0]
    )
    .expect("Failed to register SEARCH_MATCHES");

    /// Comparison leaves in the assembled listing predicate
    pub static ref SEARCH_PREDICATE_LEAVES: HistogramVec = register_histogram_vec!(
        "wasteless_search_predicate_leaves",
        "Comparison leaves in the listing search predicate",
        &["kind"],
        vec![0.0, 1.0, 2.0, 5.0, 10.0, 25.0, 50.0, 100.0]
    )
    .expect("Failed to register SEARCH_PREDICATE_LEAVES");

    /// Market listing cards created by section
    pub static ref CARDS_CREATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "wasteless_cards_created_total",
        "Total number of market listing cards created",
        &["section"]
    )
    .expect("Failed to register CARDS_CREATED_TOTAL");
}

/// Record the outcome of one search.
pub fn record_search<T>(kind: &str, result: &crate::Result<crate::models::Page<T>>) {
    match result {
        Ok(page) => {
            SEARCH_TOTAL.with_label_values(&[kind, "success"]).inc();
            SEARCH_MATCHES
                .with_label_values(&[kind])
                .observe(page.total_count as f64);
        }
        Err(e) if e.status_code().is_client_error() => {
            SEARCH_TOTAL.with_label_values(&[kind, "client_error"]).inc();
        }
        Err(_) => {
            SEARCH_TOTAL.with_label_values(&[kind, "server_error"]).inc();
        }
    }
}

/// Helper to sanitize path for metrics labels (replace numeric ids)
pub fn sanitize_path(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.chars().all(|c| c.is_ascii_digit()) {
                "{id}"
            } else {
                s
            }
        })
        .collect();
    format!("/{}", segments.join("/"))
}
