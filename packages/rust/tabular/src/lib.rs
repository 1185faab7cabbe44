//! Tabular input boundary for DashPrep.
//!
//! This crate owns the narrow "spreadsheet reader" contract: CSV rows in,
//! loosely-typed raw records out. Every cell is read as optional text;
//! typed interpretation (and default substitution) happens in the
//! normalization stage via the [`value`] helpers.
//!
//! A structurally undecodable record is skipped with a warning — one bad
//! row never stops the rest of the table. A table that cannot be opened at
//! all surfaces as [`DashPrepError::Input`]; the caller decides whether
//! that is fatal.

pub mod value;

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use dashprep_shared::{DashPrepError, Platform, Result};

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// One raw personnel-table row. Column names match the source spreadsheet;
/// absent columns deserialize to `None` rather than failing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonnelRow {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Comma-delimited specialty keywords.
    #[serde(default)]
    pub specialty: Option<String>,
    /// Principal-investigator funding for the reporting year, in KRW.
    #[serde(default, rename = "budget_pi_25")]
    pub budget: Option<String>,
    #[serde(default, rename = "paper_2025")]
    pub papers: Option<String>,
    #[serde(default, rename = "EST_STRT_YR")]
    pub career_start_year: Option<String>,
    #[serde(default, rename = "정밀의료기기")]
    pub flag_medical_device: Option<String>,
    #[serde(default, rename = "정밀재생")]
    pub flag_regeneration: Option<String>,
    #[serde(default, rename = "면역-마이크로바이옴")]
    pub flag_immune_microbiome: Option<String>,
    #[serde(default, rename = "신약")]
    pub flag_new_drug: Option<String>,
    #[serde(default, rename = "데이터")]
    pub flag_data: Option<String>,
    #[serde(default, rename = "혁신형의사과학자")]
    pub flag_physician_scientist: Option<String>,
}

impl PersonnelRow {
    /// The raw membership-flag cell for one platform.
    pub fn flag_cell(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::MedicalDevice => self.flag_medical_device.as_deref(),
            Platform::Regeneration => self.flag_regeneration.as_deref(),
            Platform::ImmuneMicrobiome => self.flag_immune_microbiome.as_deref(),
            Platform::NewDrug => self.flag_new_drug.as_deref(),
            Platform::Data => self.flag_data.as_deref(),
            Platform::PhysicianScientist => self.flag_physician_scientist.as_deref(),
        }
    }
}

/// One raw funded-projects row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectRow {
    #[serde(default)]
    pub title: Option<String>,
    /// Free-text programme/project name.
    #[serde(default)]
    pub project: Option<String>,
    /// Principal-investigator name.
    #[serde(default)]
    pub pi: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    /// Funding amount in KRW.
    #[serde(default)]
    pub budget: Option<String>,
}

// ---------------------------------------------------------------------------
// Readers
// ---------------------------------------------------------------------------

/// Read the personnel table.
pub fn read_personnel(path: &Path) -> Result<Vec<PersonnelRow>> {
    read_rows(path)
}

/// Read the funded-projects table.
pub fn read_projects(path: &Path) -> Result<Vec<ProjectRow>> {
    read_rows(path)
}

/// Read a CSV table into raw records. Undecodable records are skipped with
/// a warning; an unopenable file is an [`DashPrepError::Input`].
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| DashPrepError::input(path, e.to_string()))?;

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<T>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => {
                // +2: 1-based, and the header occupies the first line.
                warn!(path = %path.display(), line = index + 2, error = %e, "skipping undecodable row");
            }
        }
    }

    debug!(path = %path.display(), rows = rows.len(), "table loaded");
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

/// Column names and leading rows of a table, for `dashprep inspect`.
#[derive(Debug, Clone)]
pub struct TablePreview {
    pub columns: Vec<String>,
    /// Up to the requested number of leading data rows, as raw cells.
    pub rows: Vec<Vec<String>>,
    /// Total data rows in the table (header excluded).
    pub total_rows: usize,
}

/// Read a table's header and first `limit` rows without interpreting them.
pub fn preview(path: &Path, limit: usize) -> Result<TablePreview> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| DashPrepError::input(path, e.to_string()))?;

    let columns = reader
        .headers()
        .map_err(|e| DashPrepError::input(path, e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    let mut total_rows = 0usize;
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable record in preview");
                continue;
            }
        };
        total_rows += 1;
        if rows.len() < limit {
            rows.push(record.iter().map(str::to_string).collect());
        }
    }

    Ok(TablePreview {
        columns,
        rows,
        total_rows,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from("../../../fixtures/csv").join(name)
    }

    #[test]
    fn personnel_fixture_loads() {
        let rows = read_personnel(&fixture("personnel.fixture.csv")).expect("read fixture");
        assert_eq!(rows.len(), 5);

        let first = &rows[0];
        assert_eq!(first.name.as_deref(), Some("김진원"));
        assert_eq!(first.flag_cell(Platform::Regeneration), Some("1"));
        assert_eq!(first.flag_cell(Platform::Data), Some("1"));
        assert_eq!(first.flag_cell(Platform::NewDrug), Some("0"));
    }

    #[test]
    fn projects_fixture_loads() {
        let rows = read_projects(&fixture("projects.fixture.csv")).expect("read fixture");
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].title.as_deref(), Some("빅데이터 기반 AI 진단 플랫폼"));
        assert_eq!(rows[0].budget.as_deref(), Some("500000000"));
    }

    #[test]
    fn missing_file_is_input_error() {
        let err = read_personnel(Path::new("no-such-table.csv")).unwrap_err();
        assert!(matches!(err, DashPrepError::Input { .. }));
    }

    #[test]
    fn missing_columns_deserialize_as_none() {
        // The projects fixture has no personnel columns; reading it as
        // personnel must still produce rows, all fields defaulted.
        let rows = read_personnel(&fixture("projects.fixture.csv")).expect("read");
        assert!(!rows.is_empty());
        assert!(rows[0].name.is_none() || rows[0].name.as_deref() == Some(""));
        assert!(rows[0].flag_cell(Platform::Data).is_none());
    }

    #[test]
    fn preview_reports_columns_and_rows() {
        let p = preview(&fixture("personnel.fixture.csv"), 2).expect("preview");
        assert!(p.columns.iter().any(|c| c == "name"));
        assert!(p.columns.iter().any(|c| c == "정밀재생"));
        assert_eq!(p.rows.len(), 2);
        assert_eq!(p.total_rows, 5);
    }
}
