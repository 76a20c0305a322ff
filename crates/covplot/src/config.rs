//! Report configuration
//!
//! A `covplot.yaml` file can pin the column mapping, summary options and
//! chart style for a project. Every field is optional.
//!
//! ```yaml
//! columns:
//!   file: File
//!   found: Total Lines
//!   hit: Covered Lines
//! aggregate: mean_by_file
//! order: descending
//! zero_lines: exclude
//! chart:
//!   title: Flutter Test Coverage by File
//!   palette: threshold
//! output: reports/coverage_graph.png
//! ```

use crate::chart::ChartStyle;
use crate::columns::ColumnMapping;
use crate::dataset::{LoadOptions, ZeroLinePolicy};
use crate::result::{CovplotError, CovplotResult};
use crate::summary::{Aggregation, SortOrder, SummaryOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Output file used when nothing else names one
pub const DEFAULT_OUTPUT: &str = "coverage_report.png";

/// Everything needed to turn a coverage CSV into a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Explicit column mapping; `None` tries the built-in table
    pub columns: Option<ColumnMapping>,
    /// Row folding
    pub aggregate: Aggregation,
    /// Sort direction
    pub order: SortOrder,
    /// Handling of rows with no measurable lines
    pub zero_lines: ZeroLinePolicy,
    /// Chart appearance
    pub chart: ChartStyle,
    /// Output PNG path
    pub output: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            columns: None,
            aggregate: Aggregation::None,
            order: SortOrder::Descending,
            zero_lines: ZeroLinePolicy::TreatAsZero,
            chart: ChartStyle::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl ReportConfig {
    /// Parse YAML text
    pub fn from_yaml_str(text: &str) -> CovplotResult<Self> {
        let config: Self = serde_yaml_ng::from_str(text)
            .map_err(|e| CovplotError::config(format!("invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a YAML file
    pub fn from_yaml_file(path: &Path) -> CovplotResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CovplotError::config(format!("cannot read {}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded report config");
        Self::from_yaml_str(&text)
    }

    /// Check the config for values that cannot produce a chart
    pub fn validate(&self) -> CovplotResult<()> {
        if self.output.as_os_str().is_empty() {
            return Err(CovplotError::config("output path is empty"));
        }
        self.chart.validate()
    }

    /// Options for [`crate::dataset::load`]
    #[must_use]
    pub fn load_options(&self) -> LoadOptions {
        let options = LoadOptions::new().with_zero_lines(self.zero_lines);
        match &self.columns {
            Some(mapping) => options.with_columns(mapping.clone()),
            None => options,
        }
    }

    /// Options for [`crate::summary::summarize`]
    #[must_use]
    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions::new()
            .with_aggregate(self.aggregate)
            .with_order(self.order)
    }
}
