//! Result and error types for covplot.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for covplot operations
pub type CovplotResult<T> = Result<T, CovplotError>;

/// Errors that can occur while loading, summarising or rendering coverage
#[derive(Debug, Error)]
pub enum CovplotError {
    /// Input path does not resolve to a readable file
    #[error("Coverage CSV file not found at: {}", path.display())]
    SourceNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// Missing columns, non-numeric values or inconsistent counts
    #[error("Invalid coverage data: {message}")]
    DataFormat {
        /// Error message
        message: String,
    },

    /// Empty chart or a failure to encode or write the image
    #[error("Render failed: {message}")]
    Render {
        /// Error message
        message: String,
    },

    /// Invalid report configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },
}

impl CovplotError {
    /// Create a source-not-found error
    #[must_use]
    pub fn source_not_found(path: impl AsRef<Path>) -> Self {
        Self::SourceNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a data format error
    #[must_use]
    pub fn data_format(message: impl Into<String>) -> Self {
        Self::DataFormat {
            message: message.into(),
        }
    }

    /// Create a render error
    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
