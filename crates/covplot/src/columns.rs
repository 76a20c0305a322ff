//! Column mapping for coverage CSV headers
//!
//! Coverage exporters disagree on column names. A [`ColumnMapping`] names
//! the columns a report uses; [`resolve`] matches one against a header row,
//! trying an explicit mapping first and the built-in table otherwise.

use crate::result::{CovplotError, CovplotResult};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which columns carry the file name and the coverage numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnMapping {
    /// Raw line counts; the percentage is computed per row
    Raw {
        /// File name column
        file: String,
        /// Measurable ("found") lines column
        found: String,
        /// Executed ("hit") lines column
        hit: String,
    },
    /// A percentage column that is already computed
    Precomputed {
        /// File name column
        file: String,
        /// Coverage percentage column (0-100)
        coverage: String,
    },
}

impl ColumnMapping {
    /// Mapping over raw line counts
    #[must_use]
    pub fn raw(file: impl Into<String>, found: impl Into<String>, hit: impl Into<String>) -> Self {
        Self::Raw {
            file: file.into(),
            found: found.into(),
            hit: hit.into(),
        }
    }

    /// Mapping over a precomputed percentage column
    #[must_use]
    pub fn precomputed(file: impl Into<String>, coverage: impl Into<String>) -> Self {
        Self::Precomputed {
            file: file.into(),
            coverage: coverage.into(),
        }
    }

    /// `file, line_found, line_hit`
    #[must_use]
    pub fn line_counts() -> Self {
        Self::raw("file", "line_found", "line_hit")
    }

    /// `File, Total Lines, Covered Lines`
    #[must_use]
    pub fn totals() -> Self {
        Self::raw("File", "Total Lines", "Covered Lines")
    }

    /// `file, coverage`
    #[must_use]
    pub fn coverage_column() -> Self {
        Self::precomputed("file", "coverage")
    }

    /// Built-in mappings, in the order they are tried
    #[must_use]
    pub fn builtin() -> Vec<Self> {
        vec![Self::line_counts(), Self::totals(), Self::coverage_column()]
    }

    /// Name of the file column
    #[must_use]
    pub fn file_column(&self) -> &str {
        match self {
            Self::Raw { file, .. } | Self::Precomputed { file, .. } => file,
        }
    }

    /// Same mapping with a different file column
    #[must_use]
    pub fn with_file_column(self, file: impl Into<String>) -> Self {
        match self {
            Self::Raw { found, hit, .. } => Self::Raw {
                file: file.into(),
                found,
                hit,
            },
            Self::Precomputed { coverage, .. } => Self::Precomputed {
                file: file.into(),
                coverage,
            },
        }
    }

    /// Whether rows carry raw line counts
    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Raw { .. })
    }

    /// Resolve this mapping against a header row
    ///
    /// Returns `None` when any named column is missing.
    #[must_use]
    pub fn locate(&self, headers: &StringRecord) -> Option<ResolvedColumns> {
        let file = find_column(headers, self.file_column())?;
        let values = match self {
            Self::Raw { found, hit, .. } => ValueColumns::Counts {
                found: find_column(headers, found)?,
                hit: find_column(headers, hit)?,
            },
            Self::Precomputed { coverage, .. } => ValueColumns::Percentage {
                coverage: find_column(headers, coverage)?,
            },
        };
        Some(ResolvedColumns { file, values })
    }
}

impl fmt::Display for ColumnMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw { file, found, hit } => write!(f, "{file}, {found}, {hit}"),
            Self::Precomputed { file, coverage } => write!(f, "{file}, {coverage}"),
        }
    }
}

/// Column indexes for a resolved mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumns {
    /// File name column index
    pub file: usize,
    /// Value column indexes
    pub values: ValueColumns,
}

/// Value column indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueColumns {
    /// Found/hit count columns
    Counts {
        /// Found column index
        found: usize,
        /// Hit column index
        hit: usize,
    },
    /// Precomputed percentage column
    Percentage {
        /// Coverage column index
        coverage: usize,
    },
}

/// Find a header cell, exact match first, then ASCII case-insensitive
#[must_use]
pub fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    let name = name.trim();
    headers
        .iter()
        .position(|h| h.trim() == name)
        .or_else(|| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name)))
}

/// Resolve the mapping for a header row
///
/// An explicit mapping must match; it never falls back to the built-in
/// table.
pub fn resolve(
    headers: &StringRecord,
    explicit: Option<&ColumnMapping>,
) -> CovplotResult<(ColumnMapping, ResolvedColumns)> {
    if let Some(mapping) = explicit {
        return mapping
            .locate(headers)
            .map(|cols| (mapping.clone(), cols))
            .ok_or_else(|| {
                CovplotError::data_format(format!(
                    "header [{}] does not contain the configured columns ({mapping})",
                    join_headers(headers)
                ))
            });
    }

    ColumnMapping::builtin()
        .into_iter()
        .find_map(|mapping| mapping.locate(headers).map(|cols| (mapping, cols)))
        .ok_or_else(|| {
            let known: Vec<String> = ColumnMapping::builtin()
                .iter()
                .map(|m| format!("({m})"))
                .collect();
            CovplotError::data_format(format!(
                "header [{}] matches no known column set; expected one of {}",
                join_headers(headers),
                known.join(", ")
            ))
        })
}

fn join_headers(headers: &StringRecord) -> String {
    headers.iter().collect::<Vec<_>>().join(", ")
}
