//! Tabular outputs
//!
//! Every table is one CSV file in the output directory, written through
//! `serde` so the column layout lives on the row structs.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::algorithm::procedures::ProcedureCategory;
use crate::algorithm::regression::OddsRatioRow;
use crate::algorithm::statistics::{CategoryRate, SummaryStats};
use crate::error::{Result, StudyError};
use crate::utils::log_output_written;

/// One row of the procedure-count table
#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    /// Procedure category
    pub category: String,
    /// Admissions in the category
    pub admissions: usize,
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T], kind: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    log_output_written(kind, path);
    Ok(())
}

/// Write the descriptive-statistics table (one row per variable)
pub fn write_descriptive_stats(dir: &Path, stats: &[SummaryStats]) -> Result<()> {
    write_csv(&dir.join("descriptive_stats.csv"), stats, "descriptive statistics")
}

/// Write admission counts per procedure category
pub fn write_category_counts(
    dir: &Path,
    counts: &[(ProcedureCategory, usize)],
) -> Result<()> {
    let rows: Vec<CategoryCount> = counts
        .iter()
        .map(|(category, admissions)| CategoryCount {
            category: category.display_name().to_string(),
            admissions: *admissions,
        })
        .collect();
    write_csv(&dir.join("procedure_counts.csv"), &rows, "procedure counts")
}

/// Write per-category readmission rates
pub fn write_readmission_rates(dir: &Path, rates: &[CategoryRate]) -> Result<()> {
    write_csv(&dir.join("readmission_rates.csv"), rates, "readmission rates")
}

/// Write the odds-ratio table (intercept already excluded)
pub fn write_odds_ratios(dir: &Path, rows: &[OddsRatioRow]) -> Result<()> {
    write_csv(&dir.join("odds_ratios.csv"), rows, "odds ratios")
}

/// Write the machine-readable run summary
pub fn write_summary<T: Serialize>(dir: &Path, summary: &T) -> Result<()> {
    let path = dir.join("analysis_summary.json");
    let file = File::create(&path)?;
    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| StudyError::Output(format!("failed to write run summary: {e}")))?;
    log_output_written("run summary", &path);
    Ok(())
}
