//! Command handlers - extracted from main.rs for testability

pub mod chart;

pub use chart::{
    execute_chart, resolve_columns, resolve_output, resolve_report_config, write_summary_json,
};
