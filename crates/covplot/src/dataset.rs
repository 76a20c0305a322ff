//! Coverage dataset loading
//!
//! Reads a CSV coverage report into a [`CoverageDataset`], computing each
//! row's percentage on the way in.

use crate::columns::{self, ColumnMapping, ValueColumns};
use crate::result::{CovplotError, CovplotResult};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// What to do with rows that have no measurable lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroLinePolicy {
    /// Chart the file at 0%
    #[default]
    TreatAsZero,
    /// Drop the row
    Exclude,
}

/// Options for [`load`]
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit column mapping; the built-in table is used when unset
    pub columns: Option<ColumnMapping>,
    /// Zero-line row handling
    pub zero_lines: ZeroLinePolicy,
}

impl LoadOptions {
    /// Create default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit column mapping
    #[must_use]
    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Set the zero-line policy
    #[must_use]
    pub const fn with_zero_lines(mut self, policy: ZeroLinePolicy) -> Self {
        self.zero_lines = policy;
        self
    }
}

/// One measured source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageRow {
    /// Path or label of the file
    pub file_name: String,
    /// Measurable lines, when the report carries raw counts
    pub lines_found: Option<u64>,
    /// Executed lines, when the report carries raw counts
    pub lines_hit: Option<u64>,
    /// Line coverage, 0-100
    pub coverage_percentage: f64,
}

impl CoverageRow {
    /// Row from raw counts; `lines_found == 0` yields 0%
    pub fn from_counts(
        file_name: impl Into<String>,
        lines_found: u64,
        lines_hit: u64,
    ) -> CovplotResult<Self> {
        let file_name = file_name.into();
        if lines_hit > lines_found {
            return Err(CovplotError::data_format(format!(
                "{file_name}: {lines_hit} lines hit exceeds {lines_found} lines found"
            )));
        }
        Ok(Self {
            coverage_percentage: percentage(lines_hit, lines_found).unwrap_or(0.0),
            file_name,
            lines_found: Some(lines_found),
            lines_hit: Some(lines_hit),
        })
    }

    /// Row from a precomputed percentage
    pub fn from_percentage(file_name: impl Into<String>, percentage: f64) -> CovplotResult<Self> {
        let file_name = file_name.into();
        if !percentage.is_finite() || !(0.0..=100.0).contains(&percentage) {
            return Err(CovplotError::data_format(format!(
                "{file_name}: coverage {percentage} is outside 0-100"
            )));
        }
        Ok(Self {
            file_name,
            lines_found: None,
            lines_hit: None,
            coverage_percentage: percentage,
        })
    }
}

/// `hit / found * 100`, or `None` when nothing is measurable
#[must_use]
pub fn percentage(lines_hit: u64, lines_found: u64) -> Option<f64> {
    if lines_found == 0 {
        None
    } else {
        Some(lines_hit as f64 / lines_found as f64 * 100.0)
    }
}

/// Rows loaded from one coverage report
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageDataset {
    rows: Vec<CoverageRow>,
    mapping: ColumnMapping,
    excluded: usize,
}

impl CoverageDataset {
    /// Build a dataset from rows that are already validated
    #[must_use]
    pub fn from_rows(mapping: ColumnMapping, rows: Vec<CoverageRow>) -> Self {
        Self {
            rows,
            mapping,
            excluded: 0,
        }
    }

    /// Parse CSV text from any reader
    pub fn from_reader<R: Read>(reader: R, options: &LoadOptions) -> CovplotResult<Self> {
        let mut csv = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv
            .headers()
            .map_err(|e| CovplotError::data_format(format!("unreadable header row: {e}")))?
            .clone();
        let (mapping, cols) = columns::resolve(&headers, options.columns.as_ref())?;
        debug!(mapping = %mapping, "resolved coverage columns");

        let mut rows = Vec::new();
        let mut excluded = 0;
        for (index, record) in csv.records().enumerate() {
            let record = record.map_err(|e| CovplotError::data_format(e.to_string()))?;
            let line = record.position().map_or(index as u64 + 2, csv::Position::line);

            let file_name = field(&record, cols.file, line, &headers)?;
            if file_name.is_empty() {
                return Err(CovplotError::data_format(format!(
                    "line {line}: empty file name"
                )));
            }

            let row = match cols.values {
                ValueColumns::Counts { found, hit } => {
                    let found = parse_count(&record, found, line, &headers)?;
                    let hit = parse_count(&record, hit, line, &headers)?;
                    if found == 0 && hit == 0 && options.zero_lines == ZeroLinePolicy::Exclude {
                        warn!(file = file_name, line, "excluding row with no measurable lines");
                        excluded += 1;
                        continue;
                    }
                    CoverageRow::from_counts(file_name, found, hit)
                }
                ValueColumns::Percentage { coverage } => {
                    let value = parse_percentage(&record, coverage, line, &headers)?;
                    CoverageRow::from_percentage(file_name, value)
                }
            }
            .map_err(|e| match e {
                CovplotError::DataFormat { message } => {
                    CovplotError::data_format(format!("line {line}: {message}"))
                }
                other => other,
            })?;
            rows.push(row);
        }

        debug!(rows = rows.len(), excluded, "loaded coverage rows");
        Ok(Self {
            rows,
            mapping,
            excluded,
        })
    }

    /// Rows in input order
    #[must_use]
    pub fn rows(&self) -> &[CoverageRow] {
        &self.rows
    }

    /// Mapping that produced the rows
    #[must_use]
    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Rows dropped by [`ZeroLinePolicy::Exclude`]
    #[must_use]
    pub const fn excluded_rows(&self) -> usize {
        self.excluded
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Load a coverage CSV from disk
pub fn load(source: &Path, options: &LoadOptions) -> CovplotResult<CoverageDataset> {
    if !source.is_file() {
        return Err(CovplotError::source_not_found(source));
    }
    let file = File::open(source).map_err(|_| CovplotError::source_not_found(source))?;
    debug!(path = %source.display(), "reading coverage report");
    CoverageDataset::from_reader(file, options)
}

fn field<'r>(
    record: &'r StringRecord,
    index: usize,
    line: u64,
    headers: &StringRecord,
) -> CovplotResult<&'r str> {
    record.get(index).ok_or_else(|| {
        CovplotError::data_format(format!(
            "line {line}: missing `{}` value",
            headers.get(index).unwrap_or("?")
        ))
    })
}

fn parse_count(
    record: &StringRecord,
    index: usize,
    line: u64,
    headers: &StringRecord,
) -> CovplotResult<u64> {
    let raw = field(record, index, line, headers)?;
    if let Ok(count) = raw.parse::<u64>() {
        return Ok(count);
    }
    // Some exporters write counts as `12.0`
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Ok(v as u64),
        _ => Err(CovplotError::data_format(format!(
            "line {line}: `{}` value {raw:?} is not a non-negative integer",
            headers.get(index).unwrap_or("?")
        ))),
    }
}

fn parse_percentage(
    record: &StringRecord,
    index: usize,
    line: u64,
    headers: &StringRecord,
) -> CovplotResult<f64> {
    let raw = field(record, index, line, headers)?;
    raw.trim_end_matches('%')
        .trim_end()
        .parse::<f64>()
        .map_err(|_| {
            CovplotError::data_format(format!(
                "line {line}: `{}` value {raw:?} is not a number",
                headers.get(index).unwrap_or("?")
            ))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn parse(csv: &str) -> CovplotResult<CoverageDataset> {
        CoverageDataset::from_reader(csv.as_bytes(), &LoadOptions::new())
    }

    mod percentage_tests {
        use super::*;

        #[test]
        fn test_half_covered() {
            assert_eq!(percentage(50, 100), Some(50.0));
        }

        #[test]
        fn test_zero_found_is_undefined() {
            assert_eq!(percentage(0, 0), None);
        }

        #[test]
        fn test_from_counts_zero_found_is_zero_percent() {
            let row = CoverageRow::from_counts("c.py", 0, 0).unwrap();
            assert_eq!(row.coverage_percentage, 0.0);
            assert!(!row.coverage_percentage.is_nan());
        }

        #[test]
        fn test_from_counts_rejects_hit_above_found() {
            assert!(CoverageRow::from_counts("x.py", 10, 11).is_err());
        }

        #[test]
        fn test_from_percentage_bounds() {
            assert!(CoverageRow::from_percentage("a", 100.0).is_ok());
            assert!(CoverageRow::from_percentage("a", 100.5).is_err());
            assert!(CoverageRow::from_percentage("a", -1.0).is_err());
            assert!(CoverageRow::from_percentage("a", f64::NAN).is_err());
        }
    }

    mod reader_tests {
        use super::*;

        #[test]
        fn test_line_counts_report() {
            let ds = parse("file,line_found,line_hit\na.py,100,50\nb.py,100,100\n").unwrap();
            let pct: Vec<f64> = ds.rows().iter().map(|r| r.coverage_percentage).collect();
            assert_eq!(pct, vec![50.0, 100.0]);
            assert_eq!(ds.mapping(), &ColumnMapping::line_counts());
            assert_eq!(ds.rows()[0].lines_found, Some(100));
        }

        #[test]
        fn test_totals_report_with_spaces() {
            let ds = parse("File, Total Lines, Covered Lines\nsrc/lib.rs, 40, 30\n").unwrap();
            assert_eq!(ds.len(), 1);
            assert_eq!(ds.rows()[0].file_name, "src/lib.rs");
            assert_eq!(ds.rows()[0].coverage_percentage, 75.0);
        }

        #[test]
        fn test_precomputed_report() {
            let ds = parse("file,coverage\nlib/main.dart,87.5\nlib/app.dart,40%\n").unwrap();
            assert_eq!(ds.rows()[0].coverage_percentage, 87.5);
            assert_eq!(ds.rows()[1].coverage_percentage, 40.0);
            assert!(ds.rows()[0].lines_found.is_none());
        }

        #[test]
        fn test_float_counts_accepted() {
            let ds = parse("file,line_found,line_hit\na.py,10.0,5.0\n").unwrap();
            assert_eq!(ds.rows()[0].coverage_percentage, 50.0);
        }

        #[test]
        fn test_header_only_is_empty() {
            let ds = parse("file,line_found,line_hit\n").unwrap();
            assert!(ds.is_empty());
        }

        #[test]
        fn test_zero_lines_treated_as_zero() {
            let ds = parse("file,line_found,line_hit\nc.py,0,0\n").unwrap();
            assert_eq!(ds.rows()[0].coverage_percentage, 0.0);
        }

        #[test]
        fn test_zero_lines_excluded() {
            let options = LoadOptions::new().with_zero_lines(ZeroLinePolicy::Exclude);
            let ds = CoverageDataset::from_reader(
                "file,line_found,line_hit\nc.py,0,0\nd.py,4,1\n".as_bytes(),
                &options,
            )
            .unwrap();
            assert_eq!(ds.len(), 1);
            assert_eq!(ds.excluded_rows(), 1);
            assert_eq!(ds.rows()[0].file_name, "d.py");
        }

        #[test]
        fn test_explicit_columns() {
            let options =
                LoadOptions::new().with_columns(ColumnMapping::raw("path", "total", "covered"));
            let ds = CoverageDataset::from_reader(
                "path,total,covered\nsrc/a.rs,8,2\n".as_bytes(),
                &options,
            )
            .unwrap();
            assert_eq!(ds.rows()[0].coverage_percentage, 25.0);
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_missing_columns() {
            let err = parse("name,lines\na.py,3\n").unwrap_err();
            assert!(matches!(err, CovplotError::DataFormat { .. }));
        }

        #[test]
        fn test_empty_input() {
            assert!(matches!(parse(""), Err(CovplotError::DataFormat { .. })));
        }

        #[test]
        fn test_non_numeric_names_line_and_column() {
            let err = parse("file,line_found,line_hit\na.py,100,50\nb.py,ten,5\n").unwrap_err();
            let message = err.to_string();
            assert!(message.contains("line 3"), "{message}");
            assert!(message.contains("line_found"), "{message}");
        }

        #[test]
        fn test_negative_count() {
            assert!(parse("file,line_found,line_hit\na.py,-1,0\n").is_err());
        }

        #[test]
        fn test_hit_above_found_names_line() {
            let err = parse("file,line_found,line_hit\na.py,10,12\n").unwrap_err();
            assert!(err.to_string().contains("line 2"));
        }

        #[test]
        fn test_hit_without_found_rejected_when_excluding() {
            let options = LoadOptions::new().with_zero_lines(ZeroLinePolicy::Exclude);
            let err = CoverageDataset::from_reader(
                "file,line_found,line_hit
a.py,4,1
b.py,0,3
".as_bytes(),
                &options,
            )
            .unwrap_err();
            assert!(matches!(err, CovplotError::DataFormat { .. }));
            assert!(err.to_string().contains("line 3"));
        }

        #[test]
        fn test_ragged_record() {
            let err = parse("file,line_found,line_hit\na.py,10\n").unwrap_err();
            assert!(matches!(err, CovplotError::DataFormat { .. }));
        }

        #[test]
        fn test_empty_file_name() {
            assert!(parse("file,line_found,line_hit\n,10,5\n").is_err());
        }

        #[test]
        fn test_percentage_out_of_range() {
            assert!(parse("file,coverage\na.dart,120\n").is_err());
        }
    }

    mod load_tests {
        use super::*;

        #[test]
        fn test_load_from_disk() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("coverage.csv");
            let mut file = File::create(&path).unwrap();
            writeln!(file, "file,line_found,line_hit").unwrap();
            writeln!(file, "a.py,100,50").unwrap();
            drop(file);

            let ds = load(&path, &LoadOptions::new()).unwrap();
            assert_eq!(ds.len(), 1);
        }

        #[test]
        fn test_load_missing_file() {
            let err = load(Path::new("/nonexistent/coverage.csv"), &LoadOptions::new()).unwrap_err();
            assert!(matches!(err, CovplotError::SourceNotFound { .. }));
            assert!(err.to_string().contains("/nonexistent/coverage.csv"));
        }

        #[test]
        fn test_load_directory_is_not_a_source() {
            let temp = TempDir::new().unwrap();
            let err = load(temp.path(), &LoadOptions::new()).unwrap_err();
            assert!(matches!(err, CovplotError::SourceNotFound { .. }));
        }
    }
}
