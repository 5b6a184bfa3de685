//! Catalog Loading and Indexing
//!
//! Loads the static disease catalog with Polars and builds the immutable
//! record set plus the derived symptom vocabulary. Everything here is
//! constructed once at startup and never mutated afterwards, so the index
//! can be shared freely across concurrent resolutions.
//!
//! Source layout: one CSV row per disease with a comma-separated symptom
//! string and pipe-separated medication/procedure/precaution lists.

use std::collections::BTreeSet;
use std::path::Path;

use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::matcher::normalize;

/// Placeholder rendered for absent scalar fields and empty lists.
/// Substituted at construction time so downstream formatting stays stable.
const MISSING_FIELD: &str = "-";

/// Catalog loading failures. Fatal at startup, surfaced to the operator.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read catalog '{path}': {source}")]
    Source {
        path: String,
        #[source]
        source: PolarsError,
    },

    #[error("catalog is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("catalog contains no usable disease records")]
    Empty,
}

/// One raw catalog row before normalization.
///
/// `symptoms` is comma-separated; `medications`, `procedures` and
/// `precautions` are pipe-separated. Lets tests build an index without
/// touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct CatalogRow {
    pub disease: String,
    pub symptoms: String,
    pub description: String,
    pub medications: String,
    pub procedures: String,
    pub precautions: String,
    pub specialist: String,
}

/// Immutable disease record with its canonical symptom set
#[derive(Debug, Clone, Serialize)]
pub struct DiseaseRecord {
    /// Lowercase-normalized disease name, non-empty
    pub disease: String,

    /// Free-text description, "-" when the source left it blank
    pub description: String,

    /// Canonical symptom tokens: normalized, deduplicated, sorted.
    /// The sorted order doubles as the stable candidate order the
    /// matcher's tie-break relies on.
    pub symptoms: Vec<String>,

    /// Medication names in source order, ["-"] when empty
    pub medications: Vec<String>,

    /// Procedure names in source order, ["-"] when empty
    pub procedures: Vec<String>,

    /// Precaution texts in source order, ["-"] when empty
    pub precautions: Vec<String>,

    /// Specialist to consult, "-" when the source left it blank
    pub specialist: String,
}

/// Disease records plus the derived symptom vocabulary
///
/// Construction guarantees at least one record, at least one symptom token
/// per record, and therefore a non-empty vocabulary.
#[derive(Debug)]
pub struct CatalogIndex {
    records: Vec<DiseaseRecord>,
    vocabulary: Vec<String>,
}

impl CatalogIndex {
    /// Load the catalog from a CSV file.
    ///
    /// Requires `disease` and `symptoms` columns (header names are
    /// lowercased first, matching the merged dataset convention); the
    /// remaining columns are optional and default to "-" placeholders.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();

        let mut df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|source| DataLoadError::Source {
                path: path.display().to_string(),
                source,
            })?
            .finish()
            .map_err(|source| DataLoadError::Source {
                path: path.display().to_string(),
                source,
            })?;

        lowercase_column_names(&mut df);

        let disease_col = required_str_column(&df, "disease")?;
        let symptoms_col = required_str_column(&df, "symptoms")?;
        let description_col = optional_str_column(&df, "description");
        let medications_col = optional_str_column(&df, "medications");
        let procedures_col = optional_str_column(&df, "procedures");
        let precautions_col = optional_str_column(&df, "precautions");
        let specialist_col = optional_str_column(&df, "specialist");

        let cell = |col: Option<&StringChunked>, idx: usize| -> String {
            col.and_then(|c| c.get(idx)).unwrap_or("").to_string()
        };

        let mut rows = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            rows.push(CatalogRow {
                disease: disease_col.get(idx).unwrap_or("").to_string(),
                symptoms: symptoms_col.get(idx).unwrap_or("").to_string(),
                description: cell(description_col, idx),
                medications: cell(medications_col, idx),
                procedures: cell(procedures_col, idx),
                precautions: cell(precautions_col, idx),
                specialist: cell(specialist_col, idx),
            });
        }

        Self::from_rows(rows)
    }

    /// Build the index from raw rows.
    ///
    /// Rows whose disease name or symptom set normalizes to empty are
    /// skipped; a source with no usable row at all fails with `Empty`.
    /// Duplicate disease names are kept as-is: the resolver's
    /// first-record-wins tie-break governs which one surfaces.
    pub fn from_rows(rows: Vec<CatalogRow>) -> Result<Self, DataLoadError> {
        let mut records = Vec::with_capacity(rows.len());
        let mut vocabulary: BTreeSet<String> = BTreeSet::new();

        for row in rows {
            let disease = normalize(&row.disease);

            let mut symptoms: Vec<String> = row
                .symptoms
                .split(',')
                .map(normalize)
                .filter(|s| !s.is_empty())
                .collect();
            symptoms.sort_unstable();
            symptoms.dedup();

            if disease.is_empty() || symptoms.is_empty() {
                continue;
            }

            vocabulary.extend(symptoms.iter().cloned());

            records.push(DiseaseRecord {
                disease,
                description: scalar_or_placeholder(&row.description),
                symptoms,
                medications: split_listing(&row.medications),
                procedures: split_listing(&row.procedures),
                precautions: split_listing(&row.precautions),
                specialist: scalar_or_placeholder(&row.specialist),
            });
        }

        if records.is_empty() {
            return Err(DataLoadError::Empty);
        }

        Ok(Self {
            records,
            vocabulary: vocabulary.into_iter().collect(),
        })
    }

    /// All known symptom tokens, sorted. Deterministic and non-empty.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// All records in source order
    pub fn records(&self) -> &[DiseaseRecord] {
        &self.records
    }
}

/// Standardize column names to lowercase, mirroring the merged dataset
/// loader (header case varies across the source spreadsheets).
fn lowercase_column_names(df: &mut DataFrame) {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    for name in names {
        let lower = name.to_lowercase();
        if lower != name {
            // Cannot collide: the rename only fires when the case differs.
            let _ = df.rename(&name, lower.into());
        }
    }
}

fn required_str_column<'a>(
    df: &'a DataFrame,
    name: &'static str,
) -> Result<&'a StringChunked, DataLoadError> {
    df.column(name)
        .map_err(|_| DataLoadError::MissingColumn(name))?
        .str()
        .map_err(|_| DataLoadError::MissingColumn(name))
}

fn optional_str_column<'a>(df: &'a DataFrame, name: &str) -> Option<&'a StringChunked> {
    df.column(name).ok()?.str().ok()
}

/// Parse a pipe-separated listing, substituting ["-"] when nothing remains
fn split_listing(raw: &str) -> Vec<String> {
    let parts: Vec<String> = raw
        .split('|')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if parts.is_empty() {
        vec![MISSING_FIELD.to_string()]
    } else {
        parts
    }
}

fn scalar_or_placeholder(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        MISSING_FIELD.to_string()
    } else {
        trimmed.to_string()
    }
}
