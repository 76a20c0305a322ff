//! covplot CLI library
//!
//! Argument parsing, configuration merging and terminal output for the
//! `covplot` binary.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod handlers;
mod output;

pub use commands::{AggregateArg, Cli, ColorArg, OrderArg, PaletteArg, ZeroLinesArg};
pub use config::{init_tracing, CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{summary_lines, Reporter};
