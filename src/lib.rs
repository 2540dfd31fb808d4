//! Retrospective 30-day readmission analysis for septic arthritis
//! hospital admissions.
//!
//! The crate is a single-pass analytical pipeline: it loads one CSV
//! export, derives patient identities, readmission flags and procedure
//! categories, fits a multivariable logistic regression, and writes
//! tables and figures to an output directory.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod report;
pub mod study;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{ColumnMap, StudyConfig};
pub use error::{Result, StudyError};
pub use models::{Admission, CohortRecord, FlaggedAdmission, RawAdmission};

// Pipeline stages
pub use algorithm::cleaning::{CleaningReport, clean_admissions};
pub use algorithm::procedures::{ProcedureCategory, classify_procedure};
pub use algorithm::readmission::flag_readmissions;
pub use algorithm::regression::{OddsRatioRow, ReadmissionModel, fit_readmission_model};

// Entry point
pub use study::{RunSummary, run_study};
