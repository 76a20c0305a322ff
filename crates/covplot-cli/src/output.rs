//! Terminal output

use console::{style, Style, Term};
use covplot::chart::format_percentage;
use covplot::CoverageSummary;
use std::path::Path;

/// Styled reporter for command results
#[derive(Debug)]
pub struct Reporter {
    term: Term,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
}

impl Reporter {
    /// Create a new reporter writing to stdout
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            use_color,
            quiet,
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "OK".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print the saved-chart line and a short summary
    pub fn chart_saved(&self, path: &Path, summary: &CoverageSummary, decimals: u8) {
        self.success(&format!("Coverage chart saved to {}", path.display()));
        if self.quiet {
            return;
        }
        for line in summary_lines(summary, decimals) {
            let line = if self.use_color {
                Style::new().dim().apply_to(line).to_string()
            } else {
                line
            };
            let _ = self.term.write_line(&format!("  {line}"));
        }
    }
}

/// Plain summary lines: file count, mean, best and worst
#[must_use]
pub fn summary_lines(summary: &CoverageSummary, decimals: u8) -> Vec<String> {
    let mut lines = vec![format!("Files: {}", summary.len())];
    if let Some(mean) = summary.mean_coverage() {
        lines.push(format!("Mean coverage: {}", format_percentage(mean, decimals)));
    }
    if let Some(best) = summary.best() {
        lines.push(format!(
            "Best: {} ({})",
            best.file_name,
            format_percentage(best.coverage_percentage, decimals)
        ));
    }
    if let Some(worst) = summary.worst() {
        lines.push(format!(
            "Worst: {} ({})",
            worst.file_name,
            format_percentage(worst.coverage_percentage, decimals)
        ));
    }
    lines
}
