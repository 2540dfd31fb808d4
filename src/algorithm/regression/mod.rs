//! Readmission risk model
//!
//! Ties the regression dataset to the logistic fitter and exposes the
//! odds-ratio table and predicted probabilities the reports consume.

pub mod dataset;
pub mod logistic;

pub use dataset::{RegressionDataset, RegressionRow, build_dataset};
pub use logistic::{FitOptions, FittedModel, fit_logistic};

use serde::Serialize;

use crate::algorithm::procedures::ProcedureCategory;
use crate::error::Result;
use crate::models::CohortRecord;
use ndarray::Array1;

/// One reported predictor level
#[derive(Debug, Clone, Serialize)]
pub struct OddsRatioRow {
    /// Predictor term
    pub term: String,
    /// Odds ratio, `exp` of the coefficient
    pub odds_ratio: f64,
    /// Lower bound of the confidence interval on the odds-ratio scale
    pub ci_lower: f64,
    /// Upper bound of the confidence interval on the odds-ratio scale
    pub ci_upper: f64,
    /// Two-sided Wald p-value
    pub p_value: f64,
}

/// A fitted readmission model together with the dataset it was fit on
#[derive(Debug, Clone)]
pub struct ReadmissionModel {
    /// The dataset the model was fit on
    pub dataset: RegressionDataset,
    /// The converged fit
    pub fit: FittedModel,
}

impl ReadmissionModel {
    /// Odds ratios with confidence bounds and p-values, intercept excluded
    #[must_use]
    pub fn odds_ratios(&self) -> Vec<OddsRatioRow> {
        self.fit
            .terms
            .iter()
            .enumerate()
            .skip(1) // intercept is not reported
            .map(|(j, term)| OddsRatioRow {
                term: term.clone(),
                odds_ratio: self.fit.coefficients[j].exp(),
                ci_lower: self.fit.ci_lower[j].exp(),
                ci_upper: self.fit.ci_upper[j].exp(),
                p_value: self.fit.p_values[j],
            })
            .collect()
    }

    /// Predicted readmission probabilities over the regression dataset
    #[must_use]
    pub fn predicted_probabilities(&self) -> Array1<f64> {
        self.fit.predict_proba(self.dataset.design.view())
    }

    /// Outcome labels aligned with [`Self::predicted_probabilities`]
    #[must_use]
    pub fn outcome_labels(&self) -> Vec<bool> {
        self.dataset.rows.iter().map(|r| r.readmitted).collect()
    }
}

/// Build the dataset and fit the readmission model
///
/// Failure here (too few rows, non-convergence, singularity) is not fatal
/// to the run; the caller reports the model as unavailable and continues.
pub fn fit_readmission_model(
    records: &[CohortRecord],
    reference: ProcedureCategory,
) -> Result<ReadmissionModel> {
    let dataset = build_dataset(records, reference)?;
    let fit = fit_logistic(
        dataset.design.view(),
        dataset.outcome.view(),
        dataset.terms.clone(),
        &FitOptions::default(),
    )?;
    log::info!(
        "Model converged in {} iterations, log-likelihood {:.3}",
        fit.iterations,
        fit.log_likelihood
    );
    for (j, term) in fit.terms.iter().enumerate() {
        log::info!(
            "  {term}: coef {:+.4} (se {:.4}, p {:.4})",
            fit.coefficients[j],
            fit.standard_errors[j],
            fit.p_values[j]
        );
    }
    Ok(ReadmissionModel { dataset, fit })
}
