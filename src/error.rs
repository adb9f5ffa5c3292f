//! Error handling for the correlation pipeline.
//!
//! Provides error types with context for record parsing, dataset
//! compatibility checks, export and chart rendering failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorrelationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Dataset not found at path: {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Malformed record on line {line}: {reason}")]
    ParseFailure { line: usize, reason: String },

    #[error("Generated data has incompatible years: {} missing from visitor data", missing_years.join(", "))]
    DataIncompatible { missing_years: Vec<String> },

    #[error("Export to {path} failed: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Chart rendering failed for {path}: {reason}")]
    Chart { path: PathBuf, reason: String },

    #[error("Processing engine error: {reason}")]
    Engine { reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl CorrelationError {
    /// Create a parse failure for a 1-based line number
    pub fn parse_failure(line: usize, reason: impl Into<String>) -> Self {
        Self::ParseFailure {
            line,
            reason: reason.into(),
        }
    }

    /// Create an export error with the target path
    pub fn export(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Export {
            path: path.into(),
            source,
        }
    }

    /// Create a chart rendering error
    pub fn chart(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Chart {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an engine error
    pub fn engine(reason: impl Into<String>) -> Self {
        Self::Engine {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the failure only affects the export step
    pub fn is_export_failure(&self) -> bool {
        matches!(
            self,
            Self::DataIncompatible { .. } | Self::Export { .. } | Self::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CorrelationError>;
