//! Procedure categories for the readmission analysis
//!
//! This module defines the treatment categories admissions are grouped
//! into for the descriptive tables and the regression.

use std::fmt;

/// Treatment categories assigned from the free-text procedure description
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProcedureCategory {
    /// Non-operative management (antibiotics, immobilisation)
    ConservativeClinical = 1,
    /// Arthroplasty, large-joint arthrodesis, ligament reconstruction,
    /// amputation or disarticulation
    MajorSurgery = 2,
    /// Arthrotomy, joint drainage or foreign-body removal
    SpecificProcedures = 3,
    /// Any other surgical procedure
    MinorIntermediateSurgery = 4,
    /// No procedure recorded, or none of the keyword rules matched
    OtherUnspecified = 5,
}

impl ProcedureCategory {
    /// Get the display name for this category
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::ConservativeClinical => "Conservative/Clinical",
            Self::MajorSurgery => "Major Surgery",
            Self::SpecificProcedures => "Specific Procedures",
            Self::MinorIntermediateSurgery => "Minor/Intermediate Surgery",
            Self::OtherUnspecified => "Other/Unspecified",
        }
    }

    /// Get all categories, in their display and coding order
    #[must_use]
    pub const fn all_categories() -> [Self; 5] {
        [
            Self::ConservativeClinical,
            Self::MajorSurgery,
            Self::SpecificProcedures,
            Self::MinorIntermediateSurgery,
            Self::OtherUnspecified,
        ]
    }
}

impl fmt::Display for ProcedureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
