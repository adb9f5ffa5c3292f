//! CSV serialization of the joined table
//!
//! Writes `Year,LACrimesCount,LAMuseumVisitorsCount` with raw totals and
//! reads such a file back.

use crate::constants::{EXPORT_CRIMES_COLUMN, EXPORT_VISITORS_COLUMN, EXPORT_YEAR_COLUMN};
use crate::error::{CorrelationError, Result};
use crate::models::{JoinedRow, YearKey};

use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Write joined rows to `path`, replacing any existing file
///
/// Returns the number of data rows written.
pub fn write_joined_csv(rows: &[JoinedRow], path: &Path) -> Result<usize> {
    let years: Vec<&str> = rows.iter().map(|r| r.year.as_str()).collect();
    let crimes: Vec<f64> = rows.iter().map(|r| r.crime_total).collect();
    let visitors: Vec<f64> = rows.iter().map(|r| r.visitor_total).collect();

    let mut frame = DataFrame::new(vec![
        Column::new(EXPORT_YEAR_COLUMN.into(), years),
        Column::new(EXPORT_CRIMES_COLUMN.into(), crimes),
        Column::new(EXPORT_VISITORS_COLUMN.into(), visitors),
    ])?;

    let mut file = File::create(path).map_err(|e| CorrelationError::export(path, e))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut frame)
        .map_err(|e| CorrelationError::export(path, std::io::Error::other(e)))?;

    debug!("Wrote {} joined rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

/// Read a file produced by [`write_joined_csv`]
pub fn read_joined_csv(path: &Path) -> Result<Vec<JoinedRow>> {
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    // Years are inferred as integers and totals may be too
    let years = frame.column(EXPORT_YEAR_COLUMN)?.cast(&DataType::String)?;
    let crimes = frame.column(EXPORT_CRIMES_COLUMN)?.cast(&DataType::Float64)?;
    let visitors = frame
        .column(EXPORT_VISITORS_COLUMN)?
        .cast(&DataType::Float64)?;

    let years = years.as_materialized_series().str()?;
    let crimes = crimes.as_materialized_series().f64()?;
    let visitors = visitors.as_materialized_series().f64()?;

    years
        .into_iter()
        .zip(crimes.into_iter())
        .zip(visitors.into_iter())
        .enumerate()
        .map(|(index, ((year, crime_total), visitor_total))| {
            // Header is line 1
            let line = index + 2;
            let year = year
                .and_then(YearKey::parse)
                .ok_or_else(|| CorrelationError::parse_failure(line, "missing or invalid year"))?;
            let (Some(crime_total), Some(visitor_total)) = (crime_total, visitor_total) else {
                return Err(CorrelationError::parse_failure(line, "missing total"));
            };
            Ok(JoinedRow {
                year,
                crime_total,
                visitor_total,
            })
        })
        .collect()
}
