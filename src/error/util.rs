//! Utility functions for error handling
//!
//! This module provides utility functions to make error handling more convenient.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, StudyError};

/// Safely open a file with rich error information
///
/// This function attempts to open a file and provides detailed
/// error information if the operation fails.
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
///
/// # Returns
/// * `Result<fs::File>` - The opened file or a detailed error
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if !path.exists() {
        return Err(StudyError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("file not found: {} (needed for: {purpose})", path.display()),
        )));
    }

    if !path.is_file() {
        return Err(StudyError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "path is not a file: {} (expected a file for: {purpose})",
                path.display()
            ),
        )));
    }

    match fs::File::open(path) {
        Ok(file) => Ok(file),
        Err(e) => {
            let context = match e.kind() {
                io::ErrorKind::PermissionDenied => {
                    format!("permission denied opening {}", path.display())
                }
                _ => format!("failed to open {} for: {purpose}", path.display()),
            };
            Err(StudyError::Io(io::Error::new(e.kind(), context)))
        }
    }
}

/// Check that the output directory exists and is a directory, creating it if absent
///
/// All tabular and graphical outputs land in one directory; it is created
/// on first use so a fresh checkout runs without manual setup.
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            return Err(StudyError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("output path is not a directory: {}", path.display()),
            )));
        }
        return Ok(());
    }

    fs::create_dir_all(path).map_err(|e| {
        StudyError::Io(io::Error::new(
            e.kind(),
            format!("failed to create output directory {}: {e}", path.display()),
        ))
    })
}
