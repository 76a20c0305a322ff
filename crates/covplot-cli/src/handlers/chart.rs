//! Chart command handler
//!
//! Flags override the YAML config, which overrides the defaults.

use crate::commands::Cli;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::Reporter;
use covplot::{
    load, render, summarize, ColumnMapping, CoverageSummary, CovplotError, ReportConfig,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name used under `--output-dir`
pub const OUTPUT_DIR_FILE_NAME: &str = "coverage_graph.png";

/// Execute the chart command
pub fn execute_chart(config: &CliConfig, cli: &Cli) -> CliResult<CoverageSummary> {
    // checked before any config is read or any output is touched
    if !cli.input.is_file() {
        return Err(CovplotError::source_not_found(&cli.input).into());
    }

    let report = resolve_report_config(cli)?;
    let output = resolve_output(cli, &report);
    debug!(input = %cli.input.display(), output = %output.display(), "chart paths resolved");

    let dataset = load(&cli.input, &report.load_options())?;
    let summary = summarize(&dataset, &report.summary_options());
    info!(
        rows = dataset.len(),
        excluded = dataset.excluded_rows(),
        bars = summary.len(),
        "coverage summarised"
    );

    render(&summary, &output, &report.chart)?;

    let reporter = Reporter::new(config.color.should_color(), config.verbosity.is_quiet());
    if dataset.excluded_rows() > 0 {
        reporter.warning(&format!(
            "{} file(s) with no measurable lines left out",
            dataset.excluded_rows()
        ));
    }

    if let Some(ref json_path) = cli.json {
        write_summary_json(&summary, json_path)?;
        reporter.info(&format!("Summary exported to {}", json_path.display()));
    }

    reporter.chart_saved(&output, &summary, report.chart.decimals);
    Ok(summary)
}

/// Merge the config file (if any) with command-line overrides
pub fn resolve_report_config(cli: &Cli) -> CliResult<ReportConfig> {
    let mut report = match cli.config {
        Some(ref path) => ReportConfig::from_yaml_file(path)?,
        None => ReportConfig::default(),
    };

    report.columns = resolve_columns(report.columns.take(), cli)?;

    if let Some(aggregate) = cli.aggregate {
        report.aggregate = aggregate.into();
    }
    if let Some(order) = cli.order {
        report.order = order.into();
    }
    if let Some(zero_lines) = cli.zero_lines {
        report.zero_lines = zero_lines.into();
    }

    let mut chart = std::mem::take(&mut report.chart);
    if let Some(ref title) = cli.title {
        chart = chart.with_title(title.clone());
    }
    if let Some(ref x_label) = cli.x_label {
        chart = chart.with_x_label(x_label.clone());
    }
    if let Some(width) = cli.width {
        chart = chart.with_width(width);
    }
    if let Some(decimals) = cli.decimals {
        chart = chart.with_decimals(decimals);
    }
    if let Some(palette) = cli.palette {
        chart = chart.with_palette(palette.into());
    }
    report.chart = chart;

    report.validate()?;
    Ok(report)
}

/// Column mapping after applying `--*-column` flags to `base`
pub fn resolve_columns(base: Option<ColumnMapping>, cli: &Cli) -> CliResult<Option<ColumnMapping>> {
    let file = cli
        .file_column
        .clone()
        .or_else(|| base.as_ref().map(|m| m.file_column().to_string()))
        .unwrap_or_else(|| "file".to_string());

    if let Some(ref coverage) = cli.coverage_column {
        return Ok(Some(ColumnMapping::precomputed(file, coverage.clone())));
    }
    if let (Some(found), Some(hit)) = (&cli.found_column, &cli.hit_column) {
        return Ok(Some(ColumnMapping::raw(file, found.clone(), hit.clone())));
    }

    match (base, &cli.file_column) {
        (Some(mapping), Some(file)) => Ok(Some(mapping.with_file_column(file.clone()))),
        (None, Some(_)) => Err(CliError::invalid_argument(
            "--file-column needs --found-column and --hit-column, --coverage-column, \
             or a `columns` mapping in the config file",
        )),
        (base, None) => Ok(base),
    }
}

/// Output path: positional argument, then `--output-dir`, then config
#[must_use]
pub fn resolve_output(cli: &Cli, report: &ReportConfig) -> PathBuf {
    if let Some(ref output) = cli.output {
        return output.clone();
    }
    if let Some(ref dir) = cli.output_dir {
        return dir.join(OUTPUT_DIR_FILE_NAME);
    }
    report.output.clone()
}

/// Write `summary` as pretty JSON
pub fn write_summary_json(summary: &CoverageSummary, path: &Path) -> CliResult<()> {
    let json = serde_json::to_string_pretty(summary).map_err(|e| CliError::export(e.to_string()))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| CliError::export(format!("{}: {e}", parent.display())))?;
    }
    fs::write(path, json).map_err(|e| CliError::export(format!("{}: {e}", path.display())))
}
