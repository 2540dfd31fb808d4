//! Configuration for the readmission study.

use std::path::PathBuf;

use crate::algorithm::procedures::ProcedureCategory;

/// Maps the analysis variables onto the column names of the input table.
///
/// Column naming is a property of the export, not of the analysis; the
/// defaults match the hospital information system extract this study was
/// run against.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    /// Patient age at admission, in years
    pub age: String,
    /// Admission date
    pub admission_date: String,
    /// Discharge date
    pub discharge_date: String,
    /// Patient birth date
    pub birth_date: String,
    /// Patient postal code
    pub postal_code: String,
    /// Free-text procedure description
    pub procedure: String,
    /// Length of stay, in days
    pub length_of_stay: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            age: "idade".to_string(),
            admission_date: "data_internacao".to_string(),
            discharge_date: "data_alta".to_string(),
            birth_date: "data_nascimento".to_string(),
            postal_code: "cep".to_string(),
            procedure: "procedimento".to_string(),
            length_of_stay: "dias_permanencia".to_string(),
        }
    }
}

/// Configuration for a study run
#[derive(Debug, Clone)]
pub struct StudyConfig {
    /// Column names of the input table
    pub columns: ColumnMap,
    /// Field delimiter of the input table
    pub delimiter: u8,
    /// Minimum age (in years) for a record to enter the cohort
    pub min_adult_age: f64,
    /// Maximum discharge-to-admission gap (in days) counted as a readmission
    pub readmission_window_days: i64,
    /// Reference category for the regression's procedure-group coding
    pub reference_category: ProcedureCategory,
    /// Date format strings tried in order when parsing date fields
    pub date_formats: Vec<String>,
    /// Directory all tables and figures are written to
    pub output_dir: PathBuf,
    /// Pixel dimensions of rendered figures
    pub figure_size: (u32, u32),
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMap::default(),
            delimiter: b',',
            min_adult_age: 18.0,
            readmission_window_days: 30,
            reference_category: ProcedureCategory::ConservativeClinical,
            date_formats: vec![
                "%Y-%m-%d".to_string(),
                "%d/%m/%Y".to_string(),
                "%d-%m-%Y".to_string(),
            ],
            output_dir: PathBuf::from("output"),
            figure_size: (1000, 700),
        }
    }
}
