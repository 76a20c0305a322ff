//! CLI argument definitions using clap

use clap::{Parser, ValueEnum};
use covplot::{Aggregation, BarPalette, SortOrder, ZeroLinePolicy};
use std::path::PathBuf;

/// covplot: render a per-file coverage bar chart from a coverage CSV
#[derive(Parser, Debug)]
#[command(name = "covplot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Coverage CSV (file,line_found,line_hit | File,Total Lines,Covered Lines | file,coverage)
    pub input: PathBuf,

    /// Output PNG path [default: coverage_report.png]
    pub output: Option<PathBuf>,

    /// Write the chart to DIR/coverage_graph.png
    #[arg(long, value_name = "DIR", conflicts_with = "output")]
    pub output_dir: Option<PathBuf>,

    /// YAML report configuration
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fold rows that share a file name
    #[arg(long)]
    pub aggregate: Option<AggregateArg>,

    /// Sort direction
    #[arg(long)]
    pub order: Option<OrderArg>,

    /// Rows whose found-line count is zero
    #[arg(long)]
    pub zero_lines: Option<ZeroLinesArg>,

    /// File name column
    #[arg(long, value_name = "NAME")]
    pub file_column: Option<String>,

    /// Measurable lines column (needs --hit-column)
    #[arg(long, value_name = "NAME", requires = "hit_column", conflicts_with = "coverage_column")]
    pub found_column: Option<String>,

    /// Executed lines column (needs --found-column)
    #[arg(long, value_name = "NAME", requires = "found_column")]
    pub hit_column: Option<String>,

    /// Precomputed percentage column
    #[arg(long, value_name = "NAME")]
    pub coverage_column: Option<String>,

    /// Chart title
    #[arg(long)]
    pub title: Option<String>,

    /// X axis label
    #[arg(long)]
    pub x_label: Option<String>,

    /// Chart width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Decimal places on bar annotations (1 or 2)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub decimals: Option<u8>,

    /// Bar colouring
    #[arg(long)]
    pub palette: Option<PaletteArg>,

    /// Also write the summary as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorArg,
}

/// Aggregation argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AggregateArg {
    /// One bar per row
    #[default]
    None,
    /// Average rows that share a file name
    MeanByFile,
}

impl From<AggregateArg> for Aggregation {
    fn from(arg: AggregateArg) -> Self {
        match arg {
            AggregateArg::None => Self::None,
            AggregateArg::MeanByFile => Self::MeanByFile,
        }
    }
}

/// Sort order argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrderArg {
    /// Highest coverage first
    #[default]
    Desc,
    /// Lowest coverage first
    Asc,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Desc => Self::Descending,
            OrderArg::Asc => Self::Ascending,
        }
    }
}

/// Zero-line policy argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZeroLinesArg {
    /// Chart the file at 0%
    #[default]
    Zero,
    /// Leave the file out
    Exclude,
}

impl From<ZeroLinesArg> for ZeroLinePolicy {
    fn from(arg: ZeroLinesArg) -> Self {
        match arg {
            ZeroLinesArg::Zero => Self::TreatAsZero,
            ZeroLinesArg::Exclude => Self::Exclude,
        }
    }
}

/// Bar palette argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaletteArg {
    /// Every bar sky blue (or the configured bar colour)
    #[default]
    Solid,
    /// Red, orange, yellow or green by coverage band
    Threshold,
}

impl From<PaletteArg> for BarPalette {
    fn from(arg: PaletteArg) -> Self {
        match arg {
            PaletteArg::Solid => Self::Solid,
            PaletteArg::Threshold => Self::Threshold,
        }
    }
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
