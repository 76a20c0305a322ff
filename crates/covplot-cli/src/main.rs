//! covplot: per-file coverage bar chart from a coverage CSV
//!
//! ## Usage
//!
//! ```bash
//! covplot coverage.csv                          # writes coverage_report.png
//! covplot coverage.csv out/chart.png            # explicit output
//! covplot coverage.csv --output-dir reports     # writes reports/coverage_graph.png
//! covplot coverage.csv --aggregate mean-by-file --order asc --json summary.json
//! ```

use clap::Parser;
use covplot_cli::{
    handlers::execute_chart, init_tracing, Cli, CliConfig, CliResult, ColorChoice, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let config = build_config(cli);
    init_tracing(config.verbosity);
    execute_chart(&config, cli)?;
    Ok(())
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);
    let color: ColorChoice = cli.color.into();
    CliConfig::new().with_verbosity(verbosity).with_color(color)
}
