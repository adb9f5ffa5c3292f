//! Main processing pipeline.
//!
//! Orchestrates a complete correlation run: both inputs are read
//! concurrently, parsed and aggregated on the shared [`Engine`], joined and
//! exported, and finally handed to the presenter. Export and chart
//! problems are reported without aborting the run.

#[cfg(test)]
pub mod tests;

use crate::aggregator::Engine;
use crate::config::CorrelationConfig;
use crate::error::{CorrelationError, Result};
use crate::export::CsvExporter;
use crate::models::{ExportOutcome, RunSummary, YearlyTotals};
use crate::parser::{ParseResult, ParseStats, RecordSchema};
use crate::presentation::{ChartPresenter, ConsolePresenter, Presenter};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::fs;
use tokio::task;
use tracing::{debug, error, info, warn};

/// Runs the read, aggregate, export and present stages for one configuration
#[derive(Debug)]
pub struct CorrelationProcessor {
    config: CorrelationConfig,
    engine: Arc<Engine>,
    exporter: CsvExporter,
    presenter: Arc<dyn Presenter>,
}

impl CorrelationProcessor {
    /// Create a processor and start its engine
    pub fn new(config: CorrelationConfig) -> Result<Self> {
        config.validate()?;

        for input in [&config.museum_input, &config.crime_input] {
            if !input.is_file() {
                return Err(CorrelationError::DatasetNotFound {
                    path: input.clone(),
                });
            }
        }

        let engine = Arc::new(Engine::new(config.workers)?);
        let exporter = CsvExporter::new(config.export_path.clone(), config.join_mode);
        let presenter: Arc<dyn Presenter> = if config.render_charts {
            Arc::new(ChartPresenter::new(
                config.resolved_chart_dir(),
                config.normalization_divisor,
            ))
        } else {
            Arc::new(ConsolePresenter)
        };

        Ok(Self {
            config,
            engine,
            exporter,
            presenter,
        })
    }

    /// Replace the presenter
    pub fn with_presenter(mut self, presenter: Arc<dyn Presenter>) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    /// Main processing entry point
    pub async fn process(self) -> Result<RunSummary> {
        let start_time = Instant::now();
        println!("{}", "Starting LA correlation run".bright_green().bold());
        println!(
            "  {} {}",
            "Museum visitors:".bright_cyan(),
            self.config.museum_input.display()
        );
        println!(
            "  {} {}",
            "Crime incidents:".bright_cyan(),
            self.config.crime_input.display()
        );
        println!(
            "  {} {}",
            "Output:".bright_cyan(),
            self.config.export_path.display()
        );

        // Step 1: Read both inputs
        println!("\n{}", "Reading inputs...".bright_yellow());
        let (museum_text, crime_text) = tokio::try_join!(
            read_input(&self.config.museum_input),
            read_input(&self.config.crime_input)
        )?;

        // Step 2: Parse and aggregate per year
        println!("{}", "Aggregating yearly totals...".bright_yellow());
        let ((museum_parse, visitors), (crime_parse, crimes)) = tokio::try_join!(
            self.load(museum_text, self.config.museum_schema.clone()),
            self.load(crime_text, self.config.crime_schema.clone())
        )?;
        report_parse_stats(&museum_parse.stats, &visitors);
        report_parse_stats(&crime_parse.stats, &crimes);

        // Step 3: Join and export
        println!("\n{}", "Exporting joined table...".bright_yellow());
        let export = self.export(&crimes, &visitors)?;

        // Step 4: Present
        let charts = self.present(&visitors, &crimes).await;

        let Self { engine, .. } = self;
        match Arc::try_unwrap(engine) {
            Ok(engine) => engine.shutdown(),
            Err(_) => debug!("Engine still referenced; pool released on drop"),
        }

        let processing_time_ms = start_time.elapsed().as_millis();
        let summary = RunSummary {
            museum_stats: museum_parse.stats,
            crime_stats: crime_parse.stats,
            visitors,
            crimes,
            export,
            charts,
            processing_time_ms,
        };
        print_summary(&summary);

        Ok(summary)
    }

    /// Parse and aggregate one input on the engine's pool
    async fn load(
        &self,
        text: String,
        schema: RecordSchema,
    ) -> Result<(ParseResult, YearlyTotals)> {
        let dataset = schema.dataset;
        let engine = Arc::clone(&self.engine);
        let max_retained = self.config.max_retained_errors;
        let spinner = self.spinner(format!("Aggregating {}...", dataset));

        let result = task::spawn_blocking(move || engine.load_dataset(&text, &schema, max_retained))
            .await
            .map_err(|e| {
                CorrelationError::engine(format!("{} aggregation task failed: {}", dataset, e))
            });

        spinner.finish_and_clear();
        result?
    }

    fn export(&self, crimes: &YearlyTotals, visitors: &YearlyTotals) -> Result<ExportOutcome> {
        match self.exporter.export(crimes, visitors) {
            Ok(rows) => {
                println!(
                    "  {} {} rows to {}",
                    "Wrote".bright_green(),
                    rows.to_string().bright_white().bold(),
                    self.exporter.output_path().display()
                );
                Ok(ExportOutcome::Written {
                    path: self.exporter.output_path().to_path_buf(),
                    rows,
                })
            }
            Err(e) if e.is_export_failure() => {
                error!("{}", e);
                println!("  {} {}", "Export skipped:".bright_red(), e);
                Ok(ExportOutcome::Skipped {
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Hand both totals to the presenter; failures are logged only
    async fn present(&self, visitors: &YearlyTotals, crimes: &YearlyTotals) -> Vec<PathBuf> {
        let presenter = Arc::clone(&self.presenter);
        let visitors = visitors.clone();
        let crimes = crimes.clone();

        match task::spawn_blocking(move || presenter.present(&visitors, &crimes)).await {
            Ok(Ok(paths)) => paths,
            Ok(Err(e)) => {
                error!("Presentation failed: {}", e);
                Vec::new()
            }
            Err(e) => {
                error!("Presentation task failed: {}", e);
                Vec::new()
            }
        }
    }

    fn spinner(&self, message: String) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

/// Read a whole input file, replacing invalid UTF-8
async fn read_input(path: &Path) -> Result<String> {
    let bytes = fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CorrelationError::DatasetNotFound {
                path: path.to_path_buf(),
            }
        } else {
            CorrelationError::Io(e)
        }
    })?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn report_parse_stats(stats: &ParseStats, totals: &YearlyTotals) {
    info!(
        "{}: {} records over {} years ({} skipped, {} out of range)",
        stats.dataset,
        stats.records_parsed,
        totals.len(),
        stats.records_skipped,
        stats.out_of_range
    );

    println!(
        "  {} {} {} records over {} years",
        "Parsed".bright_green(),
        stats.records_parsed.to_string().bright_white().bold(),
        stats.dataset,
        totals.len().to_string().bright_white()
    );
    if stats.records_skipped > 0 {
        warn!(
            "{} malformed {} lines skipped ({:.1}% success)",
            stats.records_skipped,
            stats.dataset,
            stats.success_rate()
        );
        println!(
            "  {} {} malformed lines",
            "Skipped".bright_red(),
            stats.records_skipped.to_string().bright_red().bold()
        );
    }
}

fn print_summary(summary: &RunSummary) {
    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        summary.processing_time_ms.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Visitor years:".bright_cyan(),
        summary.visitors.len().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Crime years:".bright_cyan(),
        summary.crimes.len().to_string().bright_white()
    );
    match &summary.export {
        ExportOutcome::Written { path, rows } => println!(
            "  {} {} rows in {}",
            "Exported:".bright_cyan(),
            rows.to_string().bright_white().bold(),
            path.display()
        ),
        ExportOutcome::Skipped { reason } => {
            println!("  {} {}", "Export skipped:".bright_red(), reason)
        }
    }
    for chart in &summary.charts {
        println!("  {} {}", "Chart:".bright_cyan(), chart.display());
    }
}
