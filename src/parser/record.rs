//! Individual line parsing
//!
//! Splits one delimited line according to a [`RecordSchema`] and yields
//! either an accepted record, a year-window rejection, or a parse failure.

use super::schema::{RecordSchema, ValueLayout};
use crate::error::{CorrelationError, Result};
use crate::models::{ParsedRecord, YearKey};

/// Decision for a single data line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Record(ParsedRecord),
    /// Well formed, but the year is outside the schema's window
    OutOfRange(YearKey),
}

/// Parse one data line; `line_number` is 1-based and only used for errors
pub fn parse_record(line: &str, line_number: usize, schema: &RecordSchema) -> Result<LineOutcome> {
    if line.trim().is_empty() {
        return Err(CorrelationError::parse_failure(line_number, "empty line"));
    }

    let fields: Vec<&str> = line.split(schema.delimiter).collect();
    if fields.len() < schema.min_fields() {
        return Err(CorrelationError::parse_failure(
            line_number,
            format!(
                "expected at least {} fields, found {}",
                schema.min_fields(),
                fields.len()
            ),
        ));
    }

    let year = extract_year(fields[schema.date_field], line_number, schema)?;
    if !schema.accepts_year(year.year()) {
        return Ok(LineOutcome::OutOfRange(year));
    }

    let value = match schema.values {
        ValueLayout::SumFrom(start) => sum_value_fields(&fields, start, line_number)?,
        ValueLayout::Weight(weight) => weight,
    };

    Ok(LineOutcome::Record(ParsedRecord { year, value }))
}

/// Pull the year component out of a date field
fn extract_year(date: &str, line_number: usize, schema: &RecordSchema) -> Result<YearKey> {
    let segment = date
        .split(schema.date_delimiter)
        .nth(schema.year_segment)
        .ok_or_else(|| {
            CorrelationError::parse_failure(
                line_number,
                format!(
                    "date '{}' has no component {} when split on '{}'",
                    date.trim(),
                    schema.year_segment,
                    schema.date_delimiter
                ),
            )
        })?;

    // A trailing time of day ("2015 12:00:00 AM") is tolerated
    let token = segment.split_whitespace().next().unwrap_or_default();

    YearKey::parse(token).ok_or_else(|| {
        CorrelationError::parse_failure(
            line_number,
            format!("'{}' is not a four digit year", segment.trim()),
        )
    })
}

/// Sum the non-empty numeric fields from `start` onwards
pub fn sum_value_fields(fields: &[&str], start: usize, line_number: usize) -> Result<f64> {
    let mut total = 0.0;

    for (index, raw) in fields.iter().enumerate().skip(start) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        let value = trimmed.parse::<f64>().map_err(|e| {
            CorrelationError::parse_failure(
                line_number,
                format!("field {} '{}' is not numeric ({})", index, trimmed, e),
            )
        })?;

        if !value.is_finite() || value < 0.0 {
            return Err(CorrelationError::parse_failure(
                line_number,
                format!("field {} '{}' is not a valid count", index, trimmed),
            ));
        }

        total += value;
    }

    Ok(total)
}
