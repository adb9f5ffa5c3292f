//! LA Correlator Library
//!
//! Correlates yearly Los Angeles museum visitor counts with yearly Los
//! Angeles crime incident counts.
//!
//! This library provides tools for:
//! - Parsing the museum visitors and crime incidents CSV files
//! - Aggregating both datasets to one total per year on a worker pool
//! - Checking year compatibility and exporting the joined table
//! - Printing the totals and rendering bar and line charts

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod models;
pub mod parser;
pub mod presentation;
pub mod processor;

// Re-export commonly used types
pub use aggregator::Engine;
pub use config::CorrelationConfig;
pub use error::{CorrelationError, Result};
pub use export::{CsvExporter, JoinMode};
pub use models::{DatasetKind, ExportOutcome, JoinedRow, RunSummary, YearKey, YearlyTotals};
pub use parser::RecordSchema;
pub use presentation::{ChartPresenter, ConsolePresenter, Presenter};
pub use processor::CorrelationProcessor;
