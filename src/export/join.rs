//! Year-set validation and row construction for the joined table.

use crate::error::{CorrelationError, Result};
use crate::models::{JoinedRow, YearlyTotals};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How crime totals are paired with visitor totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum JoinMode {
    /// Pair totals that share a year
    #[default]
    ByYear,
    /// Pair the i-th crime year with the i-th visitor year
    Positional,
}

/// Every crime year must also have visitor data
pub fn check_compatibility(crimes: &YearlyTotals, visitors: &YearlyTotals) -> Result<()> {
    let missing_years: Vec<String> = crimes
        .years()
        .filter(|year| !visitors.contains(year))
        .map(ToString::to_string)
        .collect();

    if missing_years.is_empty() {
        Ok(())
    } else {
        Err(CorrelationError::DataIncompatible { missing_years })
    }
}

/// Build one row per crime year, ascending
pub fn join_totals(
    crimes: &YearlyTotals,
    visitors: &YearlyTotals,
    mode: JoinMode,
) -> Result<Vec<JoinedRow>> {
    check_compatibility(crimes, visitors)?;

    let rows: Vec<JoinedRow> = match mode {
        JoinMode::ByYear => crimes
            .iter()
            .map(|(year, crime_total)| JoinedRow {
                year: year.clone(),
                crime_total,
                // Present: checked above
                visitor_total: visitors.get(year).unwrap_or_default(),
            })
            .collect(),
        // Containment guarantees at least as many visitor years as crime years
        JoinMode::Positional => crimes
            .iter()
            .zip(visitors.values())
            .map(|((year, crime_total), visitor_total)| JoinedRow {
                year: year.clone(),
                crime_total,
                visitor_total,
            })
            .collect(),
    };

    debug!("Joined {} rows ({:?})", rows.len(), mode);
    Ok(rows)
}
