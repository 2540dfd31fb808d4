//! Procedure classification
//!
//! This module maps the free-text procedure description of an admission to
//! one of five treatment categories via an ordered list of keyword rules.
//! The procedure field comes from a hospital information system and is
//! entered by hand, so matching is case- and accent-insensitive.

pub mod categories;

pub use categories::ProcedureCategory;

use crate::models::{CohortRecord, FlaggedAdmission};

/// Markers for non-operative management
const CONSERVATIVE_MARKERS: [&str; 3] = ["tratamento conservador", "conservador", "clinico"];

/// Markers for major joint surgery
const MAJOR_SURGERY_MARKERS: [&str; 7] = [
    "artroplastia total",
    "artrodese de quadril",
    "artrodese de joelho",
    "reconstrucao ligamentar",
    "amputacao",
    "desarticulacao",
    "revisao de artroplastia",
];

/// Markers for the arthrotomy/drainage/foreign-body group
const SPECIFIC_PROCEDURE_MARKERS: [&str; 3] = ["artrotomia", "drenagem", "corpo estranho"];

/// The full surgical vocabulary; any hit means the admission was operative
const SURGICAL_KEYWORDS: [&str; 14] = [
    "artrotomia",
    "artroplastia",
    "artrodese",
    "reconstrucao",
    "retirada",
    "fixador",
    "osteossintese",
    "amputacao",
    "desarticulacao",
    "drenagem",
    "sinovectomia",
    "corpo estranho",
    "biopsia",
    "revisao",
];

/// Lower-case the text and fold the Portuguese accented characters, so the
/// keyword tables can stay unaccented.
fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}

/// Classify a free-text procedure description
///
/// The rules are evaluated strictly in order; the first match wins.
/// A drainage/arthrotomy text that also mentions arthroplasty or
/// arthrodesis does not stop at the third rule; it falls through to the
/// general surgical check and lands in Minor/Intermediate Surgery.
#[must_use]
pub fn classify_procedure(name: &str) -> ProcedureCategory {
    let text = normalize(name);
    let is_surgical = contains_any(&text, &SURGICAL_KEYWORDS);

    if contains_any(&text, &CONSERVATIVE_MARKERS) && !is_surgical {
        return ProcedureCategory::ConservativeClinical;
    }

    if contains_any(&text, &MAJOR_SURGERY_MARKERS) {
        return ProcedureCategory::MajorSurgery;
    }

    if contains_any(&text, &SPECIFIC_PROCEDURE_MARKERS)
        && !(text.contains("artroplastia") || text.contains("artrodese"))
    {
        return ProcedureCategory::SpecificProcedures;
    }

    if is_surgical {
        return ProcedureCategory::MinorIntermediateSurgery;
    }

    ProcedureCategory::OtherUnspecified
}

/// Attach a procedure category to every flagged admission
///
/// Admissions without a recorded procedure go to Other/Unspecified.
#[must_use]
pub fn categorize(records: Vec<FlaggedAdmission>) -> Vec<CohortRecord> {
    records
        .into_iter()
        .map(|r| {
            let category = r
                .admission
                .procedure
                .as_deref()
                .map_or(ProcedureCategory::OtherUnspecified, classify_procedure);
            CohortRecord {
                admission: r.admission,
                patient_key: r.patient_key,
                days_to_next: r.days_to_next,
                readmitted: r.readmitted,
                category,
            }
        })
        .collect()
}
