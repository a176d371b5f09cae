//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Analysis Metrics
    pub static ref ANALYSES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("smishguard_analyses_total", "Total number of analyses by the path that produced them"),
        &["path"]
    ).expect("metric can be created");
    pub static ref REMOTE_FAILURES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("smishguard_remote_failures_total", "Total number of failed remote classification calls"),
        &["reason"]
    ).expect("metric can be created");
    pub static ref REMOTE_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "smishguard_remote_request_duration_seconds",
            "Remote classification call duration in seconds"
        ).buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["outcome"]
    ).expect("metric can be created");

    // Record Metrics
    pub static ref ANALYSIS_RECORDS_CREATED_TOTAL: IntCounter = IntCounter::new(
        "smishguard_analysis_records_created_total",
        "Total number of saved analysis records"
    ).expect("metric can be created");

    // Share Bridge Metrics
    pub static ref SHARE_BRIDGE_ENTRIES: IntGauge = IntGauge::new(
        "smishguard_share_bridge_entries",
        "Current number of payloads held by the share bridge"
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("smishguard_errors_total", "Total number of errors returned to callers"),
        &["error_type"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
pub fn init_metrics() {
    REGISTRY
        .register(Box::new(ANALYSES_TOTAL.clone()))
        .expect("ANALYSES_TOTAL can be registered");
    REGISTRY
        .register(Box::new(REMOTE_FAILURES_TOTAL.clone()))
        .expect("REMOTE_FAILURES_TOTAL can be registered");
    REGISTRY
        .register(Box::new(REMOTE_REQUEST_DURATION_SECONDS.clone()))
        .expect("REMOTE_REQUEST_DURATION_SECONDS can be registered");
    REGISTRY
        .register(Box::new(ANALYSIS_RECORDS_CREATED_TOTAL.clone()))
        .expect("ANALYSIS_RECORDS_CREATED_TOTAL can be registered");
    REGISTRY
        .register(Box::new(SHARE_BRIDGE_ENTRIES.clone()))
        .expect("SHARE_BRIDGE_ENTRIES can be registered");
    REGISTRY
        .register(Box::new(ERRORS_TOTAL.clone()))
        .expect("ERRORS_TOTAL can be registered");

    tracing::info!("Metrics registry initialized");
}
