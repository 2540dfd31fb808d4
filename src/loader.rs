//! Input table loading
//!
//! Reads the delimited admissions export and projects it onto the columns
//! the analysis uses. A missing file, an unparsable table or an absent
//! required column is fatal to the whole run; there is no partial load.

use std::path::Path;
use std::time::Instant;

use crate::config::StudyConfig;
use crate::error::util::safe_open_file;
use crate::error::{Result, StudyError};
use crate::models::RawAdmission;
use crate::utils::{log_stage_complete, log_stage_start};

/// Resolved positions of the configured columns in the input header
#[derive(Debug, Clone, Copy)]
struct ColumnIndices {
    age: usize,
    admission_date: usize,
    discharge_date: usize,
    birth_date: usize,
    postal_code: usize,
    procedure: usize,
    length_of_stay: usize,
}

fn resolve_column(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| StudyError::MissingColumn {
            column: name.to_string(),
            path: path.to_path_buf(),
        })
}

fn resolve_columns(
    headers: &csv::StringRecord,
    config: &StudyConfig,
    path: &Path,
) -> Result<ColumnIndices> {
    let columns = &config.columns;
    Ok(ColumnIndices {
        age: resolve_column(headers, &columns.age, path)?,
        admission_date: resolve_column(headers, &columns.admission_date, path)?,
        discharge_date: resolve_column(headers, &columns.discharge_date, path)?,
        birth_date: resolve_column(headers, &columns.birth_date, path)?,
        postal_code: resolve_column(headers, &columns.postal_code, path)?,
        procedure: resolve_column(headers, &columns.procedure, path)?,
        length_of_stay: resolve_column(headers, &columns.length_of_stay, path)?,
    })
}

fn field(record: &csv::StringRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Read the admissions table
///
/// Columns outside the configured map are dropped here; everything else
/// stays a raw string until the cleaning stage.
pub fn load_admissions(path: &Path, config: &StudyConfig) -> Result<Vec<RawAdmission>> {
    let start = Instant::now();
    log_stage_start("Loading admissions");

    let file = safe_open_file(path, "reading the admissions table")?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    let indices = resolve_columns(&headers, config, path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(RawAdmission {
            age: field(&record, indices.age),
            admission_date: field(&record, indices.admission_date),
            discharge_date: field(&record, indices.discharge_date),
            birth_date: field(&record, indices.birth_date),
            postal_code: field(&record, indices.postal_code),
            procedure: field(&record, indices.procedure),
            length_of_stay: field(&record, indices.length_of_stay),
        });
    }

    log_stage_complete("Loaded admissions", rows.len(), start.elapsed());
    Ok(rows)
}
