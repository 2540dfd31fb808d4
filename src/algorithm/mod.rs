//! Analysis algorithms for the readmission study
//!
//! The modules here are the pipeline's derivation and modelling stages:
//! cohort cleaning, patient identity and readmission windowing, procedure
//! classification, cohort statistics, the logistic model and its
//! discrimination metrics.

pub mod cleaning;
pub mod metrics;
pub mod procedures;
pub mod readmission;
pub mod regression;
pub mod statistics;
