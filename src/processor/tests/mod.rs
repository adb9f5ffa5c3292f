//! Integration tests for the processor module
//!
//! Runs the complete pipeline against small museum and crime fixtures.

pub mod error_handling;

use crate::config::CorrelationConfig;
use crate::error::Result;
use crate::models::YearlyTotals;
use crate::presentation::Presenter;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

pub const MUSEUM_FIXTURE: &str = "\
Month,America Tropical Interpretive Center,Avila Adobe,Chinese American Museum
2014-01,100,200,
2014-02,50,,
2015-01,10,20,
bad-line
";

pub const CRIME_FIXTURE: &str = "\
DR Number,Date Reported,Date Occurred,Time Occurred
1,01/02/2014,01/01/2014,1200
2,03/02/2014,03/01/2014,0800
3,05/05/2015,05/04/2015,0900
4,01/01/2010,01/01/2010,0100
5,garbage
";

/// Write both fixtures and return a config pointing at them
pub fn fixture_config(temp_dir: &TempDir, museum: &str, crimes: &str) -> CorrelationConfig {
    let input_dir = temp_dir.path().join("input");
    fs::create_dir_all(&input_dir).unwrap();

    let museum_path = input_dir.join("LA_museum_visitors.csv");
    let crime_path = input_dir.join("LA_Crime_Data.csv");
    fs::write(&museum_path, museum).unwrap();
    fs::write(&crime_path, crimes).unwrap();

    CorrelationConfig::default()
        .with_inputs(museum_path, crime_path)
        .with_export_path(export_path(temp_dir))
        .with_workers(2)
        .without_progress()
}

pub fn export_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("output").join("joined.csv")
}

/// Presenter that keeps what it was given
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub calls: Mutex<Vec<(YearlyTotals, YearlyTotals)>>,
}

impl Presenter for RecordingPresenter {
    fn present(&self, visitors: &YearlyTotals, crimes: &YearlyTotals) -> Result<Vec<PathBuf>> {
        self.calls
            .lock()
            .unwrap()
            .push((visitors.clone(), crimes.clone()));
        Ok(Vec::new())
    }
}

pub fn file_exists(path: &Path) -> bool {
    path.try_exists().unwrap_or(false)
}
