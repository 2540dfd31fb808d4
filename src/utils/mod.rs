//! Logging utilities
//!
//! Standardized logging helpers for the pipeline stages, so every stage
//! reports its row counts and timing the same way.

use std::path::Path;
use std::time::Duration;

/// Log the start of a pipeline stage
pub fn log_stage_start(stage: &str) {
    log::info!("--- {stage} ---");
}

/// Log a completed pipeline stage with its record count and timing
pub fn log_stage_complete(stage: &str, records: usize, elapsed: Duration) {
    log::info!("{stage}: {records} records in {elapsed:?}");
}

/// Log a written output file
pub fn log_output_written(kind: &str, path: &Path) {
    log::info!("Wrote {kind} to {}", path.display());
}

/// Log a non-fatal failure; the run continues with degraded output
pub fn log_degraded(what: &str, error: &dyn std::fmt::Display) {
    log::warn!("{what} unavailable: {error}");
}
