//! Logistic regression via iteratively reweighted least squares
//!
//! A small Newton-Raphson fitter sized for epidemiological models with a
//! handful of covariates. Wald standard errors come from the inverse of
//! the information matrix at the converged estimate; the normal-equation
//! solve and the inversion are plain Gaussian elimination, which is ample
//! at this dimensionality.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::{Result, StudyError};

/// Pivot magnitude below which the information matrix is treated as singular
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Floor for the IRLS weights, keeps the information matrix finite when
/// fitted probabilities saturate
const WEIGHT_FLOOR: f64 = 1e-10;

/// Options controlling the IRLS iteration
#[derive(Debug, Clone, Copy)]
pub struct FitOptions {
    /// Maximum Newton-Raphson iterations before declaring non-convergence
    pub max_iterations: usize,
    /// Convergence threshold on the largest absolute coefficient update
    pub tolerance: f64,
    /// Two-sided confidence level for the reported intervals
    pub confidence_level: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 25,
            tolerance: 1e-8,
            confidence_level: 0.95,
        }
    }
}

/// A converged logistic regression fit
#[derive(Debug, Clone)]
pub struct FittedModel {
    /// Term names, one per design-matrix column, intercept first
    pub terms: Vec<String>,
    /// Maximum-likelihood coefficient estimates
    pub coefficients: Array1<f64>,
    /// Wald standard errors
    pub standard_errors: Array1<f64>,
    /// Wald z statistics
    pub z_values: Array1<f64>,
    /// Two-sided p-values from the standard normal
    pub p_values: Array1<f64>,
    /// Lower confidence bounds on the coefficient scale
    pub ci_lower: Array1<f64>,
    /// Upper confidence bounds on the coefficient scale
    pub ci_upper: Array1<f64>,
    /// Log-likelihood at the estimate
    pub log_likelihood: f64,
    /// Iterations taken to converge
    pub iterations: usize,
}

impl FittedModel {
    /// Predicted probabilities for a design matrix with matching columns
    #[must_use]
    pub fn predict_proba(&self, design: ArrayView2<'_, f64>) -> Array1<f64> {
        design.dot(&self.coefficients).mapv(sigmoid)
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Fit a logistic regression of `outcome` (0/1) on `design`
///
/// The design matrix must already carry the intercept column. Returns a
/// model error on non-convergence or a singular information matrix; the
/// caller decides whether that is fatal.
pub fn fit_logistic(
    design: ArrayView2<'_, f64>,
    outcome: ArrayView1<'_, f64>,
    terms: Vec<String>,
    options: &FitOptions,
) -> Result<FittedModel> {
    let (n, p) = design.dim();
    if outcome.len() != n || terms.len() != p {
        return Err(StudyError::Model(format!(
            "design is {n}x{p} but outcome has {} rows and {} terms were named",
            outcome.len(),
            terms.len()
        )));
    }
    if n <= p {
        return Err(StudyError::Model(format!(
            "{n} observations cannot support {p} parameters"
        )));
    }

    let mut beta = Array1::<f64>::zeros(p);
    let mut converged_at = None;

    for iteration in 1..=options.max_iterations {
        let mu = design.dot(&beta).mapv(sigmoid);
        let weights = mu.mapv(|m| (m * (1.0 - m)).max(WEIGHT_FLOOR));

        let weighted_design = &design.to_owned() * &weights.clone().insert_axis(Axis(1));
        let information = design.t().dot(&weighted_design);
        let score = design.t().dot(&(&outcome.to_owned() - &mu));

        let Some(delta) = solve(information, score) else {
            return Err(StudyError::Model(
                "singular information matrix (separated or collinear covariates)".to_string(),
            ));
        };

        beta += &delta;
        let max_step = delta.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
        if max_step < options.tolerance {
            converged_at = Some(iteration);
            break;
        }
    }

    let Some(iterations) = converged_at else {
        return Err(StudyError::Model(format!(
            "IRLS did not converge in {} iterations",
            options.max_iterations
        )));
    };

    // Covariance from the information matrix at the converged estimate
    let mu = design.dot(&beta).mapv(sigmoid);
    let weights = mu.mapv(|m| (m * (1.0 - m)).max(WEIGHT_FLOOR));
    let weighted_design = &design.to_owned() * &weights.clone().insert_axis(Axis(1));
    let information = design.t().dot(&weighted_design);
    let Some(covariance) = invert(information) else {
        return Err(StudyError::Model(
            "information matrix not invertible at the converged estimate".to_string(),
        ));
    };

    let standard_errors = Array1::from_iter((0..p).map(|j| covariance[(j, j)].sqrt()));
    let z_values = &beta / &standard_errors;

    let normal = Normal::new(0.0, 1.0).unwrap();
    let p_values = z_values.mapv(|z| 2.0 * (1.0 - normal.cdf(z.abs())));
    let z_crit = normal.inverse_cdf(0.5 + options.confidence_level / 2.0);
    let ci_lower = &beta - &(&standard_errors * z_crit);
    let ci_upper = &beta + &(&standard_errors * z_crit);

    let log_likelihood = outcome
        .iter()
        .zip(mu.iter())
        .map(|(&y, &m)| {
            let m = m.clamp(WEIGHT_FLOOR, 1.0 - WEIGHT_FLOOR);
            y * m.ln() + (1.0 - y) * (1.0 - m).ln()
        })
        .sum();

    Ok(FittedModel {
        terms,
        coefficients: beta,
        standard_errors,
        z_values,
        p_values,
        ci_lower,
        ci_upper,
        log_likelihood,
        iterations,
    })
}

/// Solve `a x = b` by Gaussian elimination with partial pivoting
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let p = b.len();
    for col in 0..p {
        let pivot_row = (col..p)
            .max_by(|&i, &j| a[(i, col)].abs().total_cmp(&a[(j, col)].abs()))
            .unwrap_or(col);
        if a[(pivot_row, col)].abs() < SINGULAR_TOLERANCE {
            return None;
        }
        if pivot_row != col {
            for k in 0..p {
                let tmp = a[(col, k)];
                a[(col, k)] = a[(pivot_row, k)];
                a[(pivot_row, k)] = tmp;
            }
            b.swap(col, pivot_row);
        }
        for row in (col + 1)..p {
            let factor = a[(row, col)] / a[(col, col)];
            for k in col..p {
                a[(row, k)] -= factor * a[(col, k)];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = Array1::<f64>::zeros(p);
    for row in (0..p).rev() {
        let mut acc = b[row];
        for k in (row + 1)..p {
            acc -= a[(row, k)] * x[k];
        }
        x[row] = acc / a[(row, row)];
    }
    Some(x)
}

/// Invert a square matrix by Gauss-Jordan elimination with partial pivoting
fn invert(mut a: Array2<f64>) -> Option<Array2<f64>> {
    let p = a.nrows();
    let mut inv = Array2::<f64>::eye(p);

    for col in 0..p {
        let pivot_row = (col..p)
            .max_by(|&i, &j| a[(i, col)].abs().total_cmp(&a[(j, col)].abs()))
            .unwrap_or(col);
        if a[(pivot_row, col)].abs() < SINGULAR_TOLERANCE {
            return None;
        }
        if pivot_row != col {
            for k in 0..p {
                let tmp = a[(col, k)];
                a[(col, k)] = a[(pivot_row, k)];
                a[(pivot_row, k)] = tmp;
                let tmp = inv[(col, k)];
                inv[(col, k)] = inv[(pivot_row, k)];
                inv[(pivot_row, k)] = tmp;
            }
        }
        let pivot = a[(col, col)];
        for k in 0..p {
            a[(col, k)] /= pivot;
            inv[(col, k)] /= pivot;
        }
        for row in 0..p {
            if row == col {
                continue;
            }
            let factor = a[(row, col)];
            for k in 0..p {
                a[(row, k)] -= factor * a[(col, k)];
                inv[(row, k)] -= factor * inv[(col, k)];
            }
        }
    }
    Some(inv)
}
