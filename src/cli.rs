//! Command-line interface components.

use crate::config::CorrelationConfig;
use crate::constants::{
    DEFAULT_CRIME_INPUT, DEFAULT_EXPORT_PATH, DEFAULT_MUSEUM_INPUT, LOG_TARGET, crime,
};
use crate::error::{CorrelationError, Result};
use crate::export::JoinMode;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

/// Correlate LA museum visitor counts with LA crime incident counts
///
/// Aggregates both datasets to yearly totals, exports the joined table
/// and renders a bar chart and a line chart of the normalized totals.
#[derive(Debug, Clone, Parser)]
#[command(name = "la-correlator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Correlate yearly LA museum visitors with LA crime incidents")]
pub struct Args {
    /// Museum visitors CSV (`YYYY-MM,<count>,...`)
    #[arg(long = "museum", value_name = "FILE", default_value = DEFAULT_MUSEUM_INPUT)]
    pub museum_input: PathBuf,

    /// Crime incidents CSV (third field `MM/DD/YYYY`)
    #[arg(long = "crimes", value_name = "FILE", default_value = DEFAULT_CRIME_INPUT)]
    pub crime_input: PathBuf,

    /// Joined table output, overwritten if present
    #[arg(short = 'o', long = "output", value_name = "FILE", default_value = DEFAULT_EXPORT_PATH)]
    pub export_path: PathBuf,

    /// Directory for the chart images (defaults to the output's directory)
    #[arg(long = "chart-dir", value_name = "DIR")]
    pub chart_dir: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long = "no-charts")]
    pub no_charts: bool,

    /// How crime years are paired with visitor years in the export
    #[arg(long = "join", value_enum, default_value_t = JoinMode::ByYear)]
    pub join_mode: JoinMode,

    /// Earliest crime year counted
    #[arg(long = "min-year", value_name = "YEAR", default_value_t = crime::MIN_YEAR)]
    pub min_year: i32,

    /// Latest crime year counted (inclusive)
    #[arg(long = "max-year", value_name = "YEAR", default_value_t = crime::MAX_YEAR)]
    pub max_year: i32,

    /// Worker threads for parsing (0 = one per CPU)
    #[arg(short = 'j', long = "workers", value_name = "COUNT", default_value_t = 0)]
    pub workers: usize,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Build the run configuration from the arguments
    pub fn to_config(&self) -> Result<CorrelationConfig> {
        let mut config = CorrelationConfig::default()
            .with_inputs(&self.museum_input, &self.crime_input)
            .with_export_path(&self.export_path)
            .with_join_mode(self.join_mode)
            .with_workers(self.workers)
            .with_crime_year_window(Some(self.min_year), Some(self.max_year));

        if let Some(dir) = &self.chart_dir {
            config = config.with_chart_dir(dir);
        }
        if self.no_charts {
            config = config.without_charts();
        }
        if !self.show_progress() {
            config = config.without_progress();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress spinners (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Set up structured logging based on CLI arguments
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| CorrelationError::configuration(format!("logging setup failed: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_laexperiment_data() {
        let args = Args::parse_from(["la-correlator"]);
        let config = args.to_config().unwrap();

        assert_eq!(config.museum_input, PathBuf::from(DEFAULT_MUSEUM_INPUT));
        assert_eq!(config.crime_input, PathBuf::from(DEFAULT_CRIME_INPUT));
        assert_eq!(config.export_path, PathBuf::from(DEFAULT_EXPORT_PATH));
        assert_eq!(config.join_mode, JoinMode::ByYear);
        assert!(config.render_charts);
        assert_eq!(args.get_log_level(), "warn");
    }

    #[test]
    fn test_flags_map_onto_config() {
        let args = Args::parse_from([
            "la-correlator",
            "--museum",
            "m.csv",
            "--crimes",
            "c.csv",
            "-o",
            "out/joined.csv",
            "--join",
            "positional",
            "--min-year",
            "2010",
            "--max-year",
            "2012",
            "--no-charts",
            "-j",
            "3",
            "-vv",
        ]);
        let config = args.to_config().unwrap();

        assert_eq!(config.join_mode, JoinMode::Positional);
        assert_eq!(config.crime_schema.min_year, Some(2010));
        assert_eq!(config.crime_schema.max_year, Some(2012));
        assert_eq!(config.workers, 3);
        assert!(!config.render_charts);
        assert_eq!(config.resolved_chart_dir(), PathBuf::from("out"));
        assert_eq!(args.get_log_level(), "debug");
    }

    #[test]
    fn test_inverted_year_window_rejected() {
        let args = Args::parse_from(["la-correlator", "--min-year", "2019", "--max-year", "2014"]);
        match args.to_config() {
            Err(CorrelationError::Configuration { message }) => {
                assert!(message.contains("year window is empty"));
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_quiet_disables_progress() {
        let args = Args::parse_from(["la-correlator", "-q"]);
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.to_config().unwrap().show_progress);
    }
}
