//! Data models for the readmission study
//!
//! Each pipeline stage consumes the previous stage's record type and
//! produces a new one; no stage mutates its input in place.

pub mod admission;

pub use admission::{Admission, CohortRecord, FlaggedAdmission, RawAdmission};
