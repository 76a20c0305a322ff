//! covplot: per-file coverage bar charts from CSV coverage reports
//!
//! Loads a coverage CSV, computes each file's line coverage percentage,
//! sorts the files and draws a horizontal bar chart PNG.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────┐
//! │ coverage.csv │───►│ load         │───►│ summarize    │───►│ render   │──► chart.png
//! │              │    │ (columns,    │    │ (aggregate,  │    │ (layout, │
//! │              │    │  dataset)    │    │  sort)       │    │  encode) │
//! └──────────────┘    └──────────────┘    └──────────────┘    └──────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use covplot::{load, render, summarize, ReportConfig};
//! use std::path::Path;
//!
//! let config = ReportConfig::default();
//! let dataset = load(Path::new("coverage.csv"), &config.load_options())?;
//! let summary = summarize(&dataset, &config.summary_options());
//! render(&summary, &config.output, &config.chart)?;
//! # Ok::<(), covplot::CovplotError>(())
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod chart;
pub mod columns;
pub mod config;
pub mod dataset;
mod result;
pub mod summary;

pub use chart::{render, render_to_bytes, BarPalette, ChartStyle, Rgb};
pub use columns::ColumnMapping;
pub use config::{ReportConfig, DEFAULT_OUTPUT};
pub use dataset::{load, CoverageDataset, CoverageRow, LoadOptions, ZeroLinePolicy};
pub use result::{CovplotError, CovplotResult};
pub use summary::{
    summarize, Aggregation, CoverageSummary, SortOrder, SummaryEntry, SummaryOptions,
};
