//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Downloads (started, completed, failed by stage, bytes fetched)
//! - Muxing (duration, failures)
//! - Contact and feedback intake (stored, rejected, notification failures)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Download Metrics
// =============================================================================

/// Downloads started total by platform.
pub static DOWNLOADS_STARTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("fetchflicks_downloads_started_total", "Total downloads started"),
        &["platform"],
    )
    .unwrap()
});

/// Downloads completed total by platform.
pub static DOWNLOADS_COMPLETED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "fetchflicks_downloads_completed_total",
            "Total downloads served successfully",
        ),
        &["platform"],
    )
    .unwrap()
});

/// Downloads failed total by platform and stage.
pub static DOWNLOADS_FAILED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("fetchflicks_downloads_failed_total", "Total downloads that failed"),
        &["platform", "stage"], // stage: "input", "resolve", "fetch", "mux", "serve"
    )
    .unwrap()
});

/// Media bytes written to scratch files.
pub static BYTES_FETCHED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "fetchflicks_bytes_fetched_total",
        "Total media bytes fetched from platform CDNs",
    )
    .unwrap()
});

/// Scratch entries removed by the sweeper.
pub static ARTIFACTS_SWEPT: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "fetchflicks_artifacts_swept_total",
        "Total stale scratch entries removed",
    )
    .unwrap()
});

// =============================================================================
// Mux Metrics
// =============================================================================

/// Mux duration in seconds.
pub static MUX_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("fetchflicks_mux_duration_seconds", "Duration of ffmpeg muxing")
            .buckets(vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]),
    )
    .unwrap()
});

/// Mux failures total.
pub static MUX_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("fetchflicks_mux_failures_total", "Total failed mux runs").unwrap()
});

// =============================================================================
// Intake Metrics
// =============================================================================

/// Messages stored by kind.
pub static MESSAGES_STORED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("fetchflicks_messages_stored_total", "Total messages stored"),
        &["kind"], // "contact", "feedback"
    )
    .unwrap()
});

/// Submissions rejected by validation, by kind.
pub static MESSAGES_REJECTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "fetchflicks_messages_rejected_total",
            "Total submissions rejected by validation",
        ),
        &["kind"],
    )
    .unwrap()
});

/// Notifications that could not be sent.
pub static NOTIFICATION_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "fetchflicks_notification_failures_total",
        "Total notifications that failed to send",
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Downloads
        Box::new(DOWNLOADS_STARTED.clone()),
        Box::new(DOWNLOADS_COMPLETED.clone()),
        Box::new(DOWNLOADS_FAILED.clone()),
        Box::new(BYTES_FETCHED.clone()),
        Box::new(ARTIFACTS_SWEPT.clone()),
        // Mux
        Box::new(MUX_DURATION.clone()),
        Box::new(MUX_FAILURES.clone()),
        // Intake
        Box::new(MESSAGES_STORED.clone()),
        Box::new(MESSAGES_REJECTED.clone()),
        Box::new(NOTIFICATION_FAILURES.clone()),
    ]
}
