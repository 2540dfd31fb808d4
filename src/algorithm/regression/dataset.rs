//! Regression dataset construction
//!
//! Projects the cohort onto the model covariates, drops rows with missing
//! values, transforms age to decades, z-scores length of stay, and expands
//! the procedure category into explicit dummy columns against a reference
//! level.

use ndarray::{Array1, Array2};

use crate::algorithm::procedures::ProcedureCategory;
use crate::error::{Result, StudyError};
use crate::models::CohortRecord;

/// One regression-eligible admission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionRow {
    /// Outcome: readmitted within the window
    pub readmitted: bool,
    /// Age in decades
    pub age_decades: f64,
    /// Procedure category
    pub category: ProcedureCategory,
    /// Raw length of stay, in days
    pub length_of_stay: f64,
}

/// The model-ready dataset
#[derive(Debug, Clone)]
pub struct RegressionDataset {
    /// Regression-eligible rows, one per admission
    pub rows: Vec<RegressionRow>,
    /// Reference level the dummy columns are coded against
    pub reference: ProcedureCategory,
    /// Non-reference category levels, in coding order
    pub dummy_levels: Vec<ProcedureCategory>,
    /// Sample mean of length of stay over the eligible rows
    pub los_mean: f64,
    /// Sample standard deviation of length of stay over the eligible rows
    pub los_std: f64,
    /// Term names, one per design-matrix column, intercept first
    pub terms: Vec<String>,
    /// Design matrix: intercept, age in decades, category dummies, z-scored
    /// length of stay
    pub design: Array2<f64>,
    /// Outcome vector of 0/1 values
    pub outcome: Array1<f64>,
}

/// Build the regression dataset from the cohort
///
/// Rows missing length of stay are excluded; age, category and the
/// readmission flag are always present after cleaning. When the preferred
/// reference category never occurs in the data a warning is logged and the
/// first category level present takes its place.
pub fn build_dataset(
    records: &[CohortRecord],
    preferred_reference: ProcedureCategory,
) -> Result<RegressionDataset> {
    let rows: Vec<RegressionRow> = records
        .iter()
        .filter_map(|r| {
            r.admission.length_of_stay.map(|los| RegressionRow {
                readmitted: r.readmitted,
                age_decades: r.admission.age / 10.0,
                category: r.category,
                length_of_stay: los,
            })
        })
        .collect();

    if rows.is_empty() {
        return Err(StudyError::Model(
            "no regression-eligible rows after dropping missing values".to_string(),
        ));
    }

    let levels: Vec<ProcedureCategory> = ProcedureCategory::all_categories()
        .into_iter()
        .filter(|c| rows.iter().any(|r| r.category == *c))
        .collect();

    let reference = if levels.contains(&preferred_reference) {
        preferred_reference
    } else {
        log::warn!(
            "reference category '{}' absent from the data; coding against '{}' instead",
            preferred_reference,
            levels[0]
        );
        levels[0]
    };
    let dummy_levels: Vec<ProcedureCategory> =
        levels.into_iter().filter(|c| *c != reference).collect();

    let n = rows.len();
    let los_mean = rows.iter().map(|r| r.length_of_stay).sum::<f64>() / n as f64;
    let los_std = if n > 1 {
        let ss = rows
            .iter()
            .map(|r| (r.length_of_stay - los_mean).powi(2))
            .sum::<f64>();
        (ss / (n - 1) as f64).sqrt()
    } else {
        0.0
    };
    if los_std <= 0.0 {
        return Err(StudyError::Model(
            "length of stay has zero variance; cannot standardize".to_string(),
        ));
    }

    let mut terms = Vec::with_capacity(3 + dummy_levels.len());
    terms.push("(Intercept)".to_string());
    terms.push("age_decades".to_string());
    for level in &dummy_levels {
        terms.push(format!("procedure[{}]", level.display_name()));
    }
    terms.push("length_of_stay_z".to_string());

    let p = terms.len();
    let mut design = Array2::<f64>::zeros((n, p));
    let mut outcome = Array1::<f64>::zeros(n);
    for (i, row) in rows.iter().enumerate() {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = row.age_decades;
        for (j, level) in dummy_levels.iter().enumerate() {
            design[(i, 2 + j)] = f64::from(u8::from(row.category == *level));
        }
        design[(i, p - 1)] = (row.length_of_stay - los_mean) / los_std;
        outcome[i] = f64::from(u8::from(row.readmitted));
    }

    Ok(RegressionDataset {
        rows,
        reference,
        dummy_levels,
        los_mean,
        los_std,
        terms,
        design,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Admission;
    use chrono::NaiveDate;

    fn record(
        age: f64,
        los: Option<f64>,
        category: ProcedureCategory,
        readmitted: bool,
    ) -> CohortRecord {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        CohortRecord {
            admission: Admission {
                age,
                admission_date: date,
                discharge_date: date,
                birth_date: NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(),
                postal_code: "01000".to_string(),
                procedure: None,
                length_of_stay: los,
            },
            patient_key: "01000_1970-01-01".to_string(),
            days_to_next: None,
            readmitted,
            category,
        }
    }

    #[test]
    fn standardized_length_of_stay_has_zero_mean_unit_std() {
        let records: Vec<CohortRecord> = (0..10)
            .map(|i| {
                record(
                    40.0 + f64::from(i),
                    Some(f64::from(i * 2 + 3)),
                    ProcedureCategory::ConservativeClinical,
                    i % 3 == 0,
                )
            })
            .collect();
        let dataset =
            build_dataset(&records, ProcedureCategory::ConservativeClinical).unwrap();

        let p = dataset.terms.len();
        let col: Vec<f64> = (0..dataset.rows.len())
            .map(|i| dataset.design[(i, p - 1)])
            .collect();
        let mean = col.iter().sum::<f64>() / col.len() as f64;
        let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (col.len() - 1) as f64;
        assert!(mean.abs() < 1e-12);
        assert!((var.sqrt() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rows_missing_length_of_stay_are_excluded() {
        let records = vec![
            record(40.0, Some(5.0), ProcedureCategory::MajorSurgery, false),
            record(50.0, None, ProcedureCategory::MajorSurgery, true),
            record(60.0, Some(9.0), ProcedureCategory::SpecificProcedures, true),
        ];
        let dataset =
            build_dataset(&records, ProcedureCategory::ConservativeClinical).unwrap();
        assert_eq!(dataset.rows.len(), 2);
    }

    #[test]
    fn reference_category_is_excluded_from_terms() {
        let records = vec![
            record(40.0, Some(5.0), ProcedureCategory::ConservativeClinical, false),
            record(50.0, Some(6.0), ProcedureCategory::MajorSurgery, true),
            record(60.0, Some(9.0), ProcedureCategory::SpecificProcedures, true),
        ];
        let dataset =
            build_dataset(&records, ProcedureCategory::ConservativeClinical).unwrap();
        assert_eq!(dataset.reference, ProcedureCategory::ConservativeClinical);
        assert!(
            !dataset
                .terms
                .iter()
                .any(|t| t.contains("Conservative/Clinical"))
        );
        assert!(dataset.terms.iter().any(|t| t.contains("Major Surgery")));
        assert_eq!(dataset.terms.len(), 2 + dataset.dummy_levels.len() + 1);
    }

    #[test]
    fn absent_reference_falls_back_to_first_level() {
        let records = vec![
            record(40.0, Some(5.0), ProcedureCategory::MajorSurgery, true),
            record(50.0, Some(6.0), ProcedureCategory::OtherUnspecified, false),
        ];
        let dataset =
            build_dataset(&records, ProcedureCategory::ConservativeClinical).unwrap();
        assert_eq!(dataset.reference, ProcedureCategory::MajorSurgery);
        assert_eq!(
            dataset.dummy_levels,
            vec![ProcedureCategory::OtherUnspecified]
        );
    }

    #[test]
    fn age_is_expressed_in_decades() {
        let records = vec![
            record(45.0, Some(5.0), ProcedureCategory::MajorSurgery, true),
            record(60.0, Some(6.0), ProcedureCategory::MajorSurgery, false),
        ];
        let dataset =
            build_dataset(&records, ProcedureCategory::MajorSurgery).unwrap();
        assert!((dataset.design[(0, 1)] - 4.5).abs() < 1e-12);
        assert!((dataset.design[(1, 1)] - 6.0).abs() < 1e-12);
    }
}
