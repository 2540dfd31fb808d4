//! Cohort statistics and summaries
//!
//! This module provides the descriptive statistics for the cohort,
//! the overall readmission rate, and the per-category rates used by the
//! grouped report and figures.

use itertools::Itertools;
use serde::Serialize;

use crate::algorithm::procedures::ProcedureCategory;
use crate::models::CohortRecord;

/// Five-number summary plus mean and standard deviation for one variable
#[derive(Debug, Clone, Serialize)]
pub struct SummaryStats {
    /// Variable the summary describes
    pub variable: String,
    /// Number of non-missing values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation
    pub std: f64,
    /// Minimum
    pub min: f64,
    /// First quartile
    pub q1: f64,
    /// Median
    pub median: f64,
    /// Third quartile
    pub q3: f64,
    /// Maximum
    pub max: f64,
}

impl SummaryStats {
    /// Summarise a variable, ignoring missing values
    ///
    /// Returns `None` when no values are present. Quartiles use linear
    /// interpolation between order statistics.
    #[must_use]
    pub fn from_values(variable: &str, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).expect("non-finite value in summary"));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let ss = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
            (ss / (count - 1) as f64).sqrt()
        } else {
            0.0
        };

        Some(Self {
            variable: variable.to_string(),
            count,
            mean,
            std,
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

/// Linearly interpolated quantile of an already-sorted slice
#[must_use]
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

/// Overall readmission rate, as a percentage of all cohort admissions
#[must_use]
pub fn overall_readmission_rate(records: &[CohortRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let flagged = records.iter().filter(|r| r.readmitted).count();
    flagged as f64 / records.len() as f64 * 100.0
}

/// Readmission rate for one procedure category
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRate {
    /// Procedure category
    pub category: String,
    /// Admissions in the category
    pub admissions: usize,
    /// Flagged readmissions in the category
    pub readmissions: usize,
    /// Readmission rate as a percentage
    pub rate_percent: f64,
}

/// Admission counts per procedure category, in category order
#[must_use]
pub fn category_counts(records: &[CohortRecord]) -> Vec<(ProcedureCategory, usize)> {
    ProcedureCategory::all_categories()
        .into_iter()
        .map(|category| {
            let n = records.iter().filter(|r| r.category == category).count();
            (category, n)
        })
        .filter(|(_, n)| *n > 0)
        .collect()
}

/// Per-category readmission rates, sorted descending by rate for display
#[must_use]
pub fn readmission_rates_by_category(records: &[CohortRecord]) -> Vec<CategoryRate> {
    category_counts(records)
        .into_iter()
        .map(|(category, admissions)| {
            let readmissions = records
                .iter()
                .filter(|r| r.category == category && r.readmitted)
                .count();
            CategoryRate {
                category: category.display_name().to_string(),
                admissions,
                readmissions,
                rate_percent: readmissions as f64 / admissions as f64 * 100.0,
            }
        })
        .sorted_by(|a, b| {
            b.rate_percent
                .partial_cmp(&a.rate_percent)
                .expect("rates are finite")
        })
        .collect()
}

/// Whether any admission carries the given category
///
/// The regression warns and falls back to first-level reference coding
/// when the configured reference category never occurs in the data.
#[must_use]
pub fn category_present(records: &[CohortRecord], category: ProcedureCategory) -> bool {
    records.iter().any(|r| r.category == category)
}
