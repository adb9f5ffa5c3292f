//! Dataset joiner and exporter
//!
//! Checks that every crime year has visitor data, joins the two yearly
//! totals and writes the joined table. Nothing is created on disk when the
//! year sets are incompatible.

pub mod join;
pub mod writer;


pub use join::{JoinMode, check_compatibility, join_totals};
pub use writer::{read_joined_csv, write_joined_csv};

use crate::error::{CorrelationError, Result};
use crate::models::YearlyTotals;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the joined crime/visitor table to a fixed path
#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_path: PathBuf,
    join_mode: JoinMode,
}

impl CsvExporter {
    pub fn new(output_path: PathBuf, join_mode: JoinMode) -> Self {
        Self {
            output_path,
            join_mode,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Validate, join and write; returns the number of rows written
    pub fn export(&self, crimes: &YearlyTotals, visitors: &YearlyTotals) -> Result<usize> {
        let rows = join_totals(crimes, visitors, self.join_mode)?;

        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| CorrelationError::export(&self.output_path, e))?;
            }
        }

        let written = write_joined_csv(&rows, &self.output_path)?;
        info!(
            "Exported {} joined years to {}",
            written,
            self.output_path.display()
        );
        Ok(written)
    }
}
