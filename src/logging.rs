//! Structured logging utilities for report comparison.
//!
//! This module provides helper functions for consistent, structured logging
//! across the crate using the `tracing` crate.

use crate::report::ReportId;
use crate::request::RequestParams;
use std::fmt;

/// Helper function to format and log multi-line output without structured fields.
/// Used for formatted displays like tables and plans.
pub fn log_display<D: fmt::Display>(message: D, level: LogLevel) {
    let msg = message.to_string();
    match level {
        LogLevel::Info => tracing::info!("{}", msg),
        LogLevel::Warn => tracing::warn!("{}", msg),
        LogLevel::Error => tracing::error!("{}", msg),
        LogLevel::Debug => tracing::debug!("{}", msg),
    }
}

/// Log levels matching tracing crate levels.
#[derive(Debug, Clone, Copy)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

/// Log the start of a comparison pass.
pub fn log_comparison_start(report: &ReportId, rows: usize) {
    tracing::info!(report = %report, rows, "Starting report comparison");
}

/// Log a comparison that does not apply to this request.
pub fn log_comparison_skipped(report: &ReportId, reason: &str) {
    tracing::debug!(report = %report, reason, "Comparison skipped");
}

/// Log a failed comparison; the original table is returned.
pub fn log_comparison_fallback(report: &ReportId, error: &dyn fmt::Display) {
    tracing::warn!(
        report = %report,
        error = %error,
        "Comparison failed, returning the report unchanged"
    );
}

/// Log the fetch plan size.
pub fn log_fetch_plan(date_comparison: bool, segment_fetches: usize) {
    tracing::debug!(date_comparison, segment_fetches, "Comparison fetch plan");
}

/// Log one completed fetch.
pub fn log_fetch(
    report: &ReportId,
    params: &RequestParams,
    rows: usize,
    merged_collection: bool,
    duration_ms: u128,
) {
    tracing::debug!(
        report = %report,
        params = %params,
        rows,
        merged_collection,
        duration_ms = duration_ms as u64,
        "Fetched comparison table"
    );
}

/// Log an empty date comparison source.
pub fn log_empty_comparison(report: &ReportId) {
    tracing::info!(report = %report, "Date comparison table is empty, nothing to compare");
}

/// Log rows removed because they could not be aligned.
pub fn log_rows_dropped(label_count: usize) {
    if label_count > 0 {
        tracing::debug!(rows = label_count, "Dropped rows without counterpart");
    }
}

/// Log merge completion.
pub fn log_merge_complete(kept: usize, dropped: usize) {
    tracing::info!(kept, dropped, "Comparison merge completed");
}

/// Log configuration loading.
pub fn log_config_loaded(path: &str, reports: usize) {
    tracing::debug!(path, reports, "Configuration loaded");
}
