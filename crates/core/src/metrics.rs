//! Prometheus metrics for the review engine.
//!
//! This module provides metrics for:
//! - Quiz flow (items served, empty selections, status changes)
//! - Selection handling (rejections by reason)
//! - Storage failures

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Quiz flow
// =============================================================================

/// Quiz items served, by selection kind.
pub static QUIZ_ITEMS_SERVED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("lexireview_quiz_items_served_total", "Total quiz items served"),
        &["selection"], // "language", "text", "word_list", "text_list", "raw_query"
    )
    .unwrap()
});

/// Next-word requests that found nothing due.
pub static NOTHING_DUE: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "lexireview_nothing_due_total",
        "Next-word requests with no due word",
    )
    .unwrap()
});

/// Status transitions, by kind.
pub static STATUS_CHANGES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("lexireview_status_changes_total", "Total word status changes"),
        &["kind"], // "absolute", "delta"
    )
    .unwrap()
});

/// Rows returned per table-mode request.
pub static TABLE_ROWS: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "lexireview_table_rows",
            "Number of rows returned per table-mode request",
        )
        .buckets(vec![0.0, 1.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0]),
    )
    .unwrap()
});

// =============================================================================
// Errors
// =============================================================================

/// Requests rejected with a review error, by error kind.
pub static REVIEW_REJECTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "lexireview_review_rejections_total",
            "Requests rejected with a review error",
        ),
        &["reason"],
    )
    .unwrap()
});

/// Storage failures, by repository operation.
pub static STORAGE_ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("lexireview_storage_errors_total", "Total storage failures"),
        &["operation"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(QUIZ_ITEMS_SERVED.clone()),
        Box::new(NOTHING_DUE.clone()),
        Box::new(STATUS_CHANGES.clone()),
        Box::new(TABLE_ROWS.clone()),
        Box::new(REVIEW_REJECTIONS.clone()),
        Box::new(STORAGE_ERRORS.clone()),
    ]
}
