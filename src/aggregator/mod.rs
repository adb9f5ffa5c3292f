//! Processing engine and per-year aggregation.
//!
//! The [`Engine`] is the explicit execution context for a run: it owns the
//! worker pool used for data-parallel line parsing and drives the polars
//! group-by that reduces each dataset to one total per year. It is created
//! once at startup, shared by both datasets and shut down at the end of
//! the run.

#[cfg(test)]
pub mod tests;

use crate::error::{CorrelationError, Result};
use crate::models::{DatasetKind, ParsedRecord, Reduction, YearKey, YearlyTotals};
use crate::parser::{self, ParseResult, RecordSchema};

use polars::prelude::*;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, info};

const YEAR_COLUMN: &str = "year";
const VALUE_COLUMN: &str = "value";
const TOTAL_COLUMN: &str = "total";

/// Execution context shared by every aggregation in a run
#[derive(Debug)]
pub struct Engine {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl Engine {
    /// Start the engine with `workers` threads (0 = one per CPU)
    pub fn new(workers: usize) -> Result<Self> {
        let workers = if workers == 0 { num_cpus::get() } else { workers };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("correlator-worker-{}", index))
            .build()
            .map_err(|e| CorrelationError::engine(format!("failed to start worker pool: {}", e)))?;

        info!("Processing engine started with {} workers", workers);
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `op` inside the worker pool so parallel iterators use it
    pub fn install<OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    /// Parse a whole input file and reduce it to yearly totals
    pub fn load_dataset(
        &self,
        text: &str,
        schema: &RecordSchema,
        max_retained_errors: usize,
    ) -> Result<(ParseResult, YearlyTotals)> {
        let parsed = parser::parse_lines(text, schema, self, max_retained_errors);
        let totals = self.aggregate(schema.dataset, &parsed.records)?;
        Ok((parsed, totals))
    }

    /// Group records by year and reduce each group with the dataset's reduction
    ///
    /// Blocks until the grouped frame is materialized.
    pub fn aggregate(&self, dataset: DatasetKind, records: &[ParsedRecord]) -> Result<YearlyTotals> {
        if records.is_empty() {
            debug!("No {} records to aggregate", dataset);
            return Ok(YearlyTotals::new(dataset, BTreeMap::new()));
        }

        let start = Instant::now();
        let years: Vec<&str> = records.iter().map(|r| r.year.as_str()).collect();
        let values: Vec<f64> = records.iter().map(|r| r.value).collect();

        let frame = DataFrame::new(vec![
            Column::new(YEAR_COLUMN.into(), years),
            Column::new(VALUE_COLUMN.into(), values),
        ])?;

        let reduced = match dataset.reduction() {
            Reduction::Sum => col(VALUE_COLUMN).sum(),
            Reduction::Count => len().cast(DataType::Float64),
        }
        .alias(TOTAL_COLUMN);

        let grouped = frame
            .lazy()
            .group_by([col(YEAR_COLUMN)])
            .agg([reduced])
            .sort_by_exprs([col(YEAR_COLUMN)], SortMultipleOptions::default())
            .collect()?;

        let entries = collect_totals(&grouped)?;

        debug!(
            "Aggregated {} {} records into {} years in {:?}",
            records.len(),
            dataset,
            entries.len(),
            start.elapsed()
        );

        Ok(YearlyTotals::new(dataset, entries))
    }

    /// Tear down the worker pool
    pub fn shutdown(self) {
        debug!("Shutting down processing engine ({} workers)", self.workers);
        drop(self.pool);
    }
}

/// Materialize the grouped frame into an ordered map
fn collect_totals(grouped: &DataFrame) -> Result<BTreeMap<YearKey, f64>> {
    let years = grouped.column(YEAR_COLUMN)?.as_materialized_series().str()?;
    let totals = grouped.column(TOTAL_COLUMN)?.as_materialized_series().f64()?;

    let mut entries = BTreeMap::new();
    for (year, total) in years.into_iter().zip(totals.into_iter()) {
        let (Some(year), Some(total)) = (year, total) else {
            return Err(CorrelationError::engine("grouped frame contains null values"));
        };
        let key = YearKey::parse(year).ok_or_else(|| {
            CorrelationError::engine(format!("grouped frame produced invalid year '{}'", year))
        })?;
        entries.insert(key, total);
    }

    Ok(entries)
}
