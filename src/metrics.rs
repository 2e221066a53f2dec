//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

use crate::error::AppError;

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("intros_http_requests_total", "Total number of HTTP requests"),
        &["method", "status"]
    ).expect("metric can be created");
    pub static ref HTTP_REQUEST_DURATION_SECONDS: prometheus::HistogramVec = prometheus::HistogramVec::new(
        HistogramOpts::new(
            "intros_http_request_duration_seconds",
            "HTTP request duration in seconds"
        ).buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        &["method"]
    ).expect("metric can be created");

    // Friendship Metrics
    pub static ref FRIENDSHIP_OPERATIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("intros_friendship_operations_total", "Total number of friendship operations"),
        &["operation", "outcome"]
    ).expect("metric can be created");
    pub static ref ACCOUNTS_REGISTERED_TOTAL: IntCounter = IntCounter::new(
        "intros_accounts_registered_total",
        "Accounts registered since process start"
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("intros_errors_total", "Total number of error responses"),
        &["error_type"]
    ).expect("metric can be created");
}

static INIT: Once = Once::new();

/// Initialize metrics registry.
///
/// Safe to call more than once; registration happens on the first call.
pub fn init_metrics() {
    INIT.call_once(|| {
        REGISTRY
            .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
            .expect("HTTP_REQUESTS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
            .expect("HTTP_REQUEST_DURATION_SECONDS can be registered");
        REGISTRY
            .register(Box::new(FRIENDSHIP_OPERATIONS_TOTAL.clone()))
            .expect("FRIENDSHIP_OPERATIONS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(ACCOUNTS_REGISTERED_TOTAL.clone()))
            .expect("ACCOUNTS_REGISTERED_TOTAL can be registered");
        REGISTRY
            .register(Box::new(ERRORS_TOTAL.clone()))
            .expect("ERRORS_TOTAL can be registered");

        tracing::info!("Metrics registry initialized");
    });
}

/// Count one friendship operation, labelled by its result
pub fn observe_friendship_operation<T>(operation: &str, result: &Result<T, AppError>) {
    let outcome = match result {
        Ok(_) => "success",
        Err(error) => error.error_type(),
    };
    FRIENDSHIP_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Record a finished HTTP request
pub fn observe_http_request(method: &str, status: u16, elapsed: std::time::Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method])
        .observe(elapsed.as_secs_f64());
}
