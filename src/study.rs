//! Study orchestration
//!
//! Runs the pipeline end to end: load, clean, derive, classify, report,
//! model, evaluate. Loading and column resolution are fatal; everything
//! after that degrades per output, so a failed model still leaves the
//! descriptive tables and figures on disk.

use std::path::Path;
use std::time::Instant;

use serde::Serialize;

use crate::algorithm::cleaning::{self, CleaningReport};
use crate::algorithm::statistics::{self, SummaryStats};
use crate::algorithm::{metrics, procedures, readmission, regression};
use crate::config::StudyConfig;
use crate::error::Result;
use crate::error::util::ensure_output_dir;
use crate::loader;
use crate::models::CohortRecord;
use crate::report::{figures, tables};
use crate::utils::{log_degraded, log_stage_complete, log_stage_start};

/// Machine-readable summary of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Input file the analysis was run on
    pub input: String,
    /// Row counts per cleaning rule
    pub cleaning: CleaningReport,
    /// Admissions in the final cohort
    pub cohort_admissions: usize,
    /// Distinct derived patient keys
    pub distinct_patients: usize,
    /// Overall 30-day readmission rate, percent
    pub overall_readmission_rate_percent: f64,
    /// Whether the logistic model converged
    pub model_available: bool,
    /// Area under the ROC curve, when the model is available
    pub auc: Option<f64>,
}

fn report_or_warn(what: &str, result: Result<()>) {
    if let Err(e) = result {
        log_degraded(what, &e);
    }
}

/// Run the complete analysis
///
/// Returns the run summary that is also written to the output directory.
/// An unreadable input file or a missing required column aborts the run;
/// model and figure failures are logged and skipped.
pub fn run_study(input: &Path, config: &StudyConfig) -> Result<RunSummary> {
    let start = Instant::now();
    ensure_output_dir(&config.output_dir)?;
    figures::register_figure_font();

    let raw = loader::load_admissions(input, config)?;
    let (admissions, cleaning_report) = cleaning::clean_admissions(raw, config);

    log_stage_start("Deriving patient identities and readmissions");
    let flagged = readmission::flag_readmissions(admissions, config.readmission_window_days);
    let distinct_patients = readmission::distinct_patients(&flagged);
    log::info!(
        "{} admissions over {} distinct patients",
        flagged.len(),
        distinct_patients
    );

    let cohort = procedures::categorize(flagged);

    let overall_rate = descriptive_reports(&cohort, config);
    grouped_reports(&cohort, config);

    let (model_available, auc) = model_reports(&cohort, config);

    let summary = RunSummary {
        input: input.display().to_string(),
        cleaning: cleaning_report,
        cohort_admissions: cohort.len(),
        distinct_patients,
        overall_readmission_rate_percent: overall_rate,
        model_available,
        auc,
    };
    report_or_warn(
        "run summary",
        tables::write_summary(&config.output_dir, &summary),
    );

    log_stage_complete("Analysis", summary.cohort_admissions, start.elapsed());
    Ok(summary)
}

/// Descriptive statistics, overall rate and the age figure
fn descriptive_reports(cohort: &[CohortRecord], config: &StudyConfig) -> f64 {
    log_stage_start("Descriptive statistics");

    let ages: Vec<f64> = cohort.iter().map(|r| r.admission.age).collect();
    let stays: Vec<f64> = cohort
        .iter()
        .filter_map(|r| r.admission.length_of_stay)
        .collect();

    let mut rows = Vec::with_capacity(2);
    if let Some(stats) = SummaryStats::from_values("age", &ages) {
        rows.push(stats);
    }
    if let Some(stats) = SummaryStats::from_values("length_of_stay", &stays) {
        rows.push(stats);
    }
    report_or_warn(
        "descriptive statistics table",
        tables::write_descriptive_stats(&config.output_dir, &rows),
    );

    let overall_rate = statistics::overall_readmission_rate(cohort);
    log::info!("Overall 30-day readmission rate: {overall_rate:.2}%");

    report_or_warn(
        "age boxplot",
        figures::age_boxplot(&ages, &config.output_dir, config.figure_size),
    );
    overall_rate
}

/// Procedure-group counts and readmission rates, tables and figures
fn grouped_reports(cohort: &[CohortRecord], config: &StudyConfig) {
    log_stage_start("Procedure groups");

    let counts = statistics::category_counts(cohort);
    for (category, n) in &counts {
        log::info!("  {category}: {n} admissions");
    }
    report_or_warn(
        "procedure counts table",
        tables::write_category_counts(&config.output_dir, &counts),
    );
    report_or_warn(
        "procedure counts figure",
        figures::category_counts_bar(&counts, &config.output_dir, config.figure_size),
    );

    if !statistics::category_present(cohort, config.reference_category) {
        log::warn!(
            "reference category '{}' has no admissions; the model will code against the first level present",
            config.reference_category
        );
    }

    let rates = statistics::readmission_rates_by_category(cohort);
    report_or_warn(
        "readmission rates table",
        tables::write_readmission_rates(&config.output_dir, &rates),
    );
    report_or_warn(
        "readmission rates figure",
        figures::readmission_rates_bar(&rates, &config.output_dir, config.figure_size),
    );
}

/// Fit the model and produce the model-dependent outputs
///
/// Returns (model available, AUC). A fitting failure skips the odds-ratio
/// table, the forest plot and the ROC curve but aborts nothing else.
fn model_reports(cohort: &[CohortRecord], config: &StudyConfig) -> (bool, Option<f64>) {
    log_stage_start("Logistic regression");

    let model = match regression::fit_readmission_model(cohort, config.reference_category) {
        Ok(model) => model,
        Err(e) => {
            log_degraded("readmission model", &e);
            return (false, None);
        }
    };

    let odds_ratios = model.odds_ratios();
    report_or_warn(
        "odds ratio table",
        tables::write_odds_ratios(&config.output_dir, &odds_ratios),
    );
    report_or_warn(
        "odds ratio forest plot",
        figures::odds_ratio_forest(&odds_ratios, &config.output_dir, config.figure_size),
    );

    let probabilities = model.predicted_probabilities().to_vec();
    let labels = model.outcome_labels();
    let points = metrics::roc_points(&labels, &probabilities);
    let auc = metrics::auc(&points);
    log::info!("Model AUC: {auc:.3}");
    report_or_warn(
        "ROC curve figure",
        figures::roc_curve_figure(&points, auc, &config.output_dir, config.figure_size),
    );

    (true, Some(auc))
}
