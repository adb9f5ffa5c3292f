//! Record parser for the museum and crime input files
//!
//! Turns raw delimited text into typed `(year, value)` records. The first
//! line of a file is its header; every line equal to it is discarded.
//! Malformed lines are skipped and logged instead of failing the run, and
//! rows outside a schema's year window are filtered silently.
//!
//! ## Components
//!
//! - [`schema`] - per-dataset record layouts
//! - [`record`] - single line parsing
//! - [`stats`] - line accounting and results

pub mod record;
pub mod schema;
pub mod stats;


pub use record::{LineOutcome, parse_record};
pub use schema::{RecordSchema, ValueLayout};
pub use stats::{ParseResult, ParseStats};

use crate::aggregator::Engine;
use crate::error::Result;
use rayon::prelude::*;
use tracing::{debug, warn};

/// Parse every line of an input file
///
/// Lines are parsed in parallel on the engine's pool; accounting and
/// warnings happen afterwards in file order.
pub fn parse_lines(
    text: &str,
    schema: &RecordSchema,
    engine: &Engine,
    max_retained_errors: usize,
) -> ParseResult {
    let mut stats = ParseStats::new(schema.dataset);
    let lines: Vec<&str> = text.lines().collect();
    stats.total_lines = lines.len();

    let Some(&header) = lines.first() else {
        debug!("{} input is empty", schema.dataset);
        return ParseResult {
            records: Vec::new(),
            stats,
        };
    };

    let outcomes: Vec<Option<Result<LineOutcome>>> = engine.install(|| {
        lines
            .par_iter()
            .enumerate()
            .map(|(index, line)| (*line != header).then(|| parse_record(line, index + 1, schema)))
            .collect()
    });

    let mut records = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            None => stats.header_lines += 1,
            Some(Ok(LineOutcome::Record(record))) => {
                stats.records_parsed += 1;
                records.push(record);
            }
            Some(Ok(LineOutcome::OutOfRange(_))) => stats.out_of_range += 1,
            Some(Err(e)) => {
                warn!("Skipping {} record: {}", schema.dataset, e);
                stats.record_skip(e.to_string(), max_retained_errors);
            }
        }
    }

    debug!(
        "Parsed {} input: {} lines, {} records, {} out of range, {} skipped",
        schema.dataset,
        stats.total_lines,
        stats.records_parsed,
        stats.out_of_range,
        stats.records_skipped
    );

    ParseResult { records, stats }
}
