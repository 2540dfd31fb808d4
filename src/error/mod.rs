//! Error handling for the readmission study pipeline.

pub mod util;

use std::path::PathBuf;

/// Specialized error type for the study pipeline
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing the delimited input table
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A column required by the analysis is absent from the input header
    #[error("required column '{column}' not found in {path}")]
    MissingColumn {
        /// Configured name of the missing column
        column: String,
        /// Input file the header was read from
        path: PathBuf,
    },

    /// Model fitting failed (non-convergence, singular information matrix)
    #[error("model fitting failed: {0}")]
    Model(String),

    /// A figure could not be rendered
    #[error("figure rendering failed: {0}")]
    Figure(String),

    /// Error writing an output table
    #[error("output error: {0}")]
    Output(String),
}

/// Result type for study pipeline operations
pub type Result<T> = std::result::Result<T, StudyError>;
