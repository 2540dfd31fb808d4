//! Cohort cleaning
//!
//! This module turns raw input rows into the adult study cohort: numeric
//! coercion of age, multi-format date parsing, and a hard filter on the
//! fields every later stage depends on. No value is ever imputed; a row
//! that cannot supply the essential fields is dropped and counted.

use chrono::NaiveDate;

use crate::config::StudyConfig;
use crate::models::{Admission, RawAdmission};

/// Row counts for each cleaning rule, reported after the stage runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct CleaningReport {
    /// Rows read from the input table
    pub rows_in: usize,
    /// Rows dropped because age was missing, unparsable or below the cutoff
    pub dropped_non_adult: usize,
    /// Rows dropped for a missing or unparsable essential field
    pub dropped_missing_essential: usize,
    /// Rows retained in the cohort
    pub rows_out: usize,
}

/// Parse a date field, trying each configured format in order
///
/// The first format that parses wins; an unparsable value becomes missing.
#[must_use]
pub fn parse_date(value: &str, formats: &[String]) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Coerce a numeric field, treating unparsable or non-finite values as
/// missing ("nan" parses as a float, but it is not a usable measurement)
#[must_use]
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Clean raw rows into adult admissions with all essential fields present
///
/// Returns the retained admissions and the per-rule drop counts.
#[must_use]
pub fn clean_admissions(
    rows: Vec<RawAdmission>,
    config: &StudyConfig,
) -> (Vec<Admission>, CleaningReport) {
    let mut report = CleaningReport {
        rows_in: rows.len(),
        ..CleaningReport::default()
    };

    let mut admissions = Vec::with_capacity(rows.len());
    for row in rows {
        let age = row.age.as_deref().and_then(parse_numeric);
        let Some(age) = age.filter(|a| *a >= config.min_adult_age) else {
            report.dropped_non_adult += 1;
            continue;
        };

        let admission_date = row
            .admission_date
            .as_deref()
            .and_then(|v| parse_date(v, &config.date_formats));
        let discharge_date = row
            .discharge_date
            .as_deref()
            .and_then(|v| parse_date(v, &config.date_formats));
        let birth_date = row
            .birth_date
            .as_deref()
            .and_then(|v| parse_date(v, &config.date_formats));
        let postal_code = non_empty(row.postal_code.as_ref());

        let (Some(admission_date), Some(discharge_date), Some(birth_date), Some(postal_code)) =
            (admission_date, discharge_date, birth_date, postal_code)
        else {
            report.dropped_missing_essential += 1;
            continue;
        };

        admissions.push(Admission {
            age,
            admission_date,
            discharge_date,
            birth_date,
            postal_code,
            procedure: non_empty(row.procedure.as_ref()),
            length_of_stay: row.length_of_stay.as_deref().and_then(parse_numeric),
        });
    }

    report.rows_out = admissions.len();
    log::info!(
        "Cleaning: {} rows in, {} non-adult dropped, {} missing-essential dropped, {} retained",
        report.rows_in,
        report.dropped_non_adult,
        report.dropped_missing_essential,
        report.rows_out
    );

    (admissions, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StudyConfig;

    fn raw(age: &str, adm: &str, dis: &str, birth: &str, cep: &str) -> RawAdmission {
        RawAdmission {
            age: Some(age.to_string()),
            admission_date: Some(adm.to_string()),
            discharge_date: Some(dis.to_string()),
            birth_date: Some(birth.to_string()),
            postal_code: Some(cep.to_string()),
            procedure: Some("Artrotomia".to_string()),
            length_of_stay: Some("7".to_string()),
        }
    }

    #[test]
    fn adults_are_retained_minors_dropped() {
        let config = StudyConfig::default();
        let rows = vec![
            raw("17", "2020-01-01", "2020-01-05", "2003-01-01", "01310-100"),
            raw("18", "2020-01-01", "2020-01-05", "2002-01-01", "01310-100"),
            raw("abc", "2020-01-01", "2020-01-05", "1960-01-01", "01310-100"),
        ];
        let (admissions, report) = clean_admissions(rows, &config);
        assert_eq!(admissions.len(), 1);
        assert_eq!(report.dropped_non_adult, 2);
        assert_eq!(report.rows_out, 1);
    }

    #[test]
    fn missing_postal_code_drops_row_without_error() {
        let config = StudyConfig::default();
        let row = raw("45", "2020-01-01", "2020-01-05", "1975-01-01", "   ");
        let (admissions, report) = clean_admissions(vec![row], &config);
        assert!(admissions.is_empty());
        assert_eq!(report.dropped_missing_essential, 1);
    }

    #[test]
    fn date_formats_are_tried_in_order() {
        let config = StudyConfig::default();
        let formats = &config.date_formats;
        assert_eq!(
            parse_date("2020-03-15", formats),
            NaiveDate::from_ymd_opt(2020, 3, 15)
        );
        assert_eq!(
            parse_date("15/03/2020", formats),
            NaiveDate::from_ymd_opt(2020, 3, 15)
        );
        assert_eq!(parse_date("March 15", formats), None);
    }

    #[test]
    fn unparsable_date_drops_row() {
        let config = StudyConfig::default();
        let rows = vec![raw("45", "not-a-date", "2020-01-05", "1975-01-01", "01310-100")];
        let (admissions, report) = clean_admissions(rows, &config);
        assert!(admissions.is_empty());
        assert_eq!(report.dropped_missing_essential, 1);
    }

    #[test]
    fn optional_fields_stay_optional() {
        let config = StudyConfig::default();
        let mut row = raw("45", "2020-01-01", "2020-01-05", "1975-01-01", "01310-100");
        row.procedure = None;
        row.length_of_stay = Some("n/a".to_string());
        let (admissions, _) = clean_admissions(vec![row], &config);
        assert_eq!(admissions.len(), 1);
        assert_eq!(admissions[0].procedure, None);
        assert_eq!(admissions[0].length_of_stay, None);
    }

    #[test]
    fn non_finite_numerics_are_missing() {
        assert_eq!(parse_numeric("nan"), None);
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric(" 12.5 "), Some(12.5));
    }
}
