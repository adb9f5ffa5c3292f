//! Configuration management and validation.
//!
//! Provides the run configuration: input and output locations, the record
//! layout of each dataset, join behaviour and engine sizing.

use crate::constants::{
    DEFAULT_CRIME_INPUT, DEFAULT_EXPORT_PATH, DEFAULT_MAX_RETAINED_ERRORS, DEFAULT_MUSEUM_INPUT,
    DEFAULT_NORMALIZATION_DIVISOR,
};
use crate::error::{CorrelationError, Result};
use crate::export::JoinMode;
use crate::parser::RecordSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Global configuration for a correlation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Museum visitors CSV
    pub museum_input: PathBuf,

    /// Crime incidents CSV
    pub crime_input: PathBuf,

    /// Joined table destination (overwritten)
    pub export_path: PathBuf,

    /// Chart directory; defaults to the export's directory
    pub chart_dir: Option<PathBuf>,

    /// Render the PNG charts after export
    pub render_charts: bool,

    pub museum_schema: RecordSchema,

    pub crime_schema: RecordSchema,

    /// Pairing of crime and visitor totals in the export
    pub join_mode: JoinMode,

    /// Engine worker threads (0 = one per CPU)
    pub workers: usize,

    /// Chart values are divided by this
    pub normalization_divisor: f64,

    /// Malformed-line messages kept per dataset
    pub max_retained_errors: usize,

    /// Show progress spinners
    pub show_progress: bool,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            museum_input: PathBuf::from(DEFAULT_MUSEUM_INPUT),
            crime_input: PathBuf::from(DEFAULT_CRIME_INPUT),
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            chart_dir: None,
            render_charts: true,
            museum_schema: RecordSchema::museum(),
            crime_schema: RecordSchema::crime(),
            join_mode: JoinMode::default(),
            workers: 0,
            normalization_divisor: DEFAULT_NORMALIZATION_DIVISOR,
            max_retained_errors: DEFAULT_MAX_RETAINED_ERRORS,
            show_progress: true,
        }
    }
}

impl CorrelationConfig {
    /// Set both input files
    pub fn with_inputs(mut self, museum: impl Into<PathBuf>, crime: impl Into<PathBuf>) -> Self {
        self.museum_input = museum.into();
        self.crime_input = crime.into();
        self
    }

    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = path.into();
        self
    }

    pub fn with_chart_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chart_dir = Some(dir.into());
        self
    }

    pub fn without_charts(mut self) -> Self {
        self.render_charts = false;
        self
    }

    pub fn with_join_mode(mut self, mode: JoinMode) -> Self {
        self.join_mode = mode;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Override the crime year window
    pub fn with_crime_year_window(mut self, min_year: Option<i32>, max_year: Option<i32>) -> Self {
        self.crime_schema = self.crime_schema.with_year_window(min_year, max_year);
        self
    }

    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Directory the charts are written to
    pub fn resolved_chart_dir(&self) -> PathBuf {
        self.chart_dir.clone().unwrap_or_else(|| {
            self.export_path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }

    /// Check invariants before any processing starts
    pub fn validate(&self) -> Result<()> {
        self.museum_schema.validate()?;
        self.crime_schema.validate()?;

        if !self.normalization_divisor.is_finite() || self.normalization_divisor <= 0.0 {
            return Err(CorrelationError::configuration(format!(
                "normalization divisor must be positive, got {}",
                self.normalization_divisor
            )));
        }

        if self.export_path.as_os_str().is_empty() {
            return Err(CorrelationError::configuration("export path is empty"));
        }

        if self.museum_input == self.crime_input {
            return Err(CorrelationError::configuration(format!(
                "museum and crime inputs are the same file: {}",
                self.museum_input.display()
            )));
        }

        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CorrelationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.join_mode, JoinMode::ByYear);
        assert_eq!(config.crime_schema.min_year, Some(2014));
        assert_eq!(config.crime_schema.max_year, Some(2018));
        assert_eq!(config.museum_schema.min_year, None);
    }

    #[test]
    fn test_chart_dir_defaults_to_export_directory() {
        let config = CorrelationConfig::default().with_export_path("out/data/joined.csv");
        assert_eq!(config.resolved_chart_dir(), PathBuf::from("out/data"));

        let config = config.with_chart_dir("charts");
        assert_eq!(config.resolved_chart_dir(), PathBuf::from("charts"));
    }

    #[test]
    fn test_invalid_divisor_rejected() {
        let config = CorrelationConfig {
            normalization_divisor: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CorrelationError::Configuration { .. })
        ));
    }

    #[test]
    fn test_same_input_twice_rejected() {
        let config = CorrelationConfig::default().with_inputs("data.csv", "data.csv");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_crime_window_override() {
        let config = CorrelationConfig::default().with_crime_year_window(Some(2010), None);
        assert!(config.crime_schema.accepts_year(2010));
        assert!(config.crime_schema.accepts_year(2030));
        assert!(!config.crime_schema.accepts_year(2009));
    }
}
