//! Admission entity models
//!
//! This module contains the admission record at each stage of the pipeline:
//! as read from the input table, after cleaning, and with the derived
//! patient identity, readmission flag and procedure category attached.

use chrono::NaiveDate;

use crate::algorithm::procedures::ProcedureCategory;

/// One row of the input table, untyped
///
/// All fields are kept as raw strings exactly as read; coercion and
/// validation happen in the cleaning stage. Columns the analysis never
/// touches are dropped at load time.
#[derive(Debug, Clone, Default)]
pub struct RawAdmission {
    /// Patient age at admission
    pub age: Option<String>,
    /// Admission date
    pub admission_date: Option<String>,
    /// Discharge date
    pub discharge_date: Option<String>,
    /// Patient birth date
    pub birth_date: Option<String>,
    /// Patient postal code
    pub postal_code: Option<String>,
    /// Free-text procedure description
    pub procedure: Option<String>,
    /// Length of stay in days
    pub length_of_stay: Option<String>,
}

/// A cleaned admission record
///
/// Present only for adult patients with all essential fields parsed;
/// procedure text and length of stay remain optional downstream.
#[derive(Debug, Clone, PartialEq)]
pub struct Admission {
    /// Patient age at admission, in years
    pub age: f64,
    /// Admission date
    pub admission_date: NaiveDate,
    /// Discharge date
    pub discharge_date: NaiveDate,
    /// Patient birth date
    pub birth_date: NaiveDate,
    /// Patient postal code, trimmed
    pub postal_code: String,
    /// Free-text procedure description, trimmed
    pub procedure: Option<String>,
    /// Length of stay, in days
    pub length_of_stay: Option<f64>,
}

impl Admission {
    /// Derived patient identity key: postal code concatenated with the
    /// ISO-formatted birth date.
    ///
    /// This is a heuristic identity, not a true identifier; two patients
    /// sharing postal code and birth date collapse into one key.
    #[must_use]
    pub fn patient_key(&self) -> String {
        format!("{}_{}", self.postal_code, self.birth_date.format("%Y-%m-%d"))
    }
}

/// An admission with its derived readmission status
#[derive(Debug, Clone, PartialEq)]
pub struct FlaggedAdmission {
    /// The cleaned admission record
    pub admission: Admission,
    /// Derived patient identity key
    pub patient_key: String,
    /// Days from this discharge to the same patient's next admission,
    /// absent for the chronologically last admission of the patient
    pub days_to_next: Option<i64>,
    /// Whether the next admission began within the readmission window
    pub readmitted: bool,
}

/// An admission in its final cohort form, with the procedure category
#[derive(Debug, Clone, PartialEq)]
pub struct CohortRecord {
    /// The cleaned admission record
    pub admission: Admission,
    /// Derived patient identity key
    pub patient_key: String,
    /// Days from this discharge to the same patient's next admission
    pub days_to_next: Option<i64>,
    /// Whether the next admission began within the readmission window
    pub readmitted: bool,
    /// Procedure category assigned by the ordered keyword rules
    pub category: ProcedureCategory,
}
