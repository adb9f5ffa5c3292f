//! Presentation of the yearly totals
//!
//! Receives both ordered yearly totals after export, prints them and
//! renders the chart views. Rendering problems are logged, never fatal.

pub mod charts;
pub mod console;


pub use charts::{ChartData, DrawFn, render_bar_chart, render_line_chart};
pub use console::{format_totals, print_totals};

use crate::constants::{BAR_CHART_FILE, LINE_CHART_FILE};
use crate::error::{CorrelationError, Result};
use crate::models::YearlyTotals;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Consumer of the finished yearly totals
pub trait Presenter: std::fmt::Debug + Send + Sync {
    /// Present both datasets; returns any files produced
    fn present(&self, visitors: &YearlyTotals, crimes: &YearlyTotals) -> Result<Vec<PathBuf>>;
}

/// Prints the totals only
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn present(&self, visitors: &YearlyTotals, crimes: &YearlyTotals) -> Result<Vec<PathBuf>> {
        print_totals(visitors, crimes);
        Ok(Vec::new())
    }
}

/// Prints the totals and writes the bar and line charts
#[derive(Debug, Clone)]
pub struct ChartPresenter {
    chart_dir: PathBuf,
    divisor: f64,
}

impl ChartPresenter {
    pub fn new(chart_dir: PathBuf, divisor: f64) -> Self {
        Self { chart_dir, divisor }
    }

    pub fn bar_chart_path(&self) -> PathBuf {
        self.chart_dir.join(BAR_CHART_FILE)
    }

    pub fn line_chart_path(&self) -> PathBuf {
        self.chart_dir.join(LINE_CHART_FILE)
    }

    fn render(&self, data: &ChartData, path: PathBuf, draw: DrawFn) -> Result<PathBuf> {
        draw(data, &path).map_err(|e| CorrelationError::chart(&path, e))?;
        info!("Chart written to {}", path.display());
        Ok(path)
    }
}

impl Presenter for ChartPresenter {
    fn present(&self, visitors: &YearlyTotals, crimes: &YearlyTotals) -> Result<Vec<PathBuf>> {
        print_totals(visitors, crimes);

        let data = ChartData::normalized(visitors, crimes, self.divisor);
        if data.is_empty() {
            warn!("No yearly totals to chart");
            return Ok(Vec::new());
        }

        if let Err(e) = std::fs::create_dir_all(&self.chart_dir) {
            error!(
                "Cannot create chart directory {}: {}",
                self.chart_dir.display(),
                e
            );
            return Ok(Vec::new());
        }

        debug!(
            "Rendering charts for {} years (values / {})",
            data.years.len(),
            self.divisor
        );

        let mut written = Vec::new();
        let jobs = [
            (self.bar_chart_path(), render_bar_chart as DrawFn),
            (self.line_chart_path(), render_line_chart as DrawFn),
        ];
        for (path, draw) in jobs {
            match self.render(&data, path, draw) {
                Ok(path) => written.push(path),
                Err(e) => error!("{}", e),
            }
        }

        Ok(written)
    }
}
