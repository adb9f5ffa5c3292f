//! Core data structures for the correlation pipeline.
//!
//! Defines the year key shared by both datasets, the per-year totals
//! produced by aggregation, joined export rows and the run summary.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use crate::parser::ParseStats;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:^[0-9]{4}$)").expect("year pattern is a valid regex"));

/// Four digit calendar year used as the group and join key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearKey(String);

impl YearKey {
    /// Validate a raw token as a year key
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        YEAR_PATTERN
            .is_match(token)
            .then(|| Self(token.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the year
    pub fn year(&self) -> i32 {
        // Only ASCII digits pass `parse`, so four of them always fit
        self.0.bytes().fold(0, |acc, b| acc * 10 + i32::from(b - b'0'))
    }
}

impl fmt::Display for YearKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a dataset's rows are reduced per year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reduction {
    /// Sum the per-row values
    Sum,
    /// Count the rows, ignoring their values
    Count,
}

/// The two datasets being correlated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatasetKind {
    Museum,
    Crime,
}

impl DatasetKind {
    /// Reduction applied when aggregating this dataset
    pub fn reduction(&self) -> Reduction {
        match self {
            DatasetKind::Museum => Reduction::Sum,
            DatasetKind::Crime => Reduction::Count,
        }
    }

    /// Heading used when dumping totals to the console
    pub fn label(&self) -> &'static str {
        match self {
            DatasetKind::Museum => "Museum Visitors DS",
            DatasetKind::Crime => "Incidents DS",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::Museum => f.write_str("museum visitors"),
            DatasetKind::Crime => f.write_str("crime incidents"),
        }
    }
}

/// A single accepted input row
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub year: YearKey,
    pub value: f64,
}

/// Per-year totals for one dataset, ascending by year
///
/// Built once by the aggregator; there are no mutators.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlyTotals {
    dataset: DatasetKind,
    entries: BTreeMap<YearKey, f64>,
}

impl YearlyTotals {
    pub(crate) fn new(dataset: DatasetKind, entries: BTreeMap<YearKey, f64>) -> Self {
        Self { dataset, entries }
    }

    pub fn dataset(&self) -> DatasetKind {
        self.dataset
    }

    pub fn get(&self, year: &YearKey) -> Option<f64> {
        self.entries.get(year).copied()
    }

    pub fn contains(&self, year: &YearKey) -> bool {
        self.entries.contains_key(year)
    }

    /// Years in ascending order
    pub fn years(&self) -> impl Iterator<Item = &YearKey> {
        self.entries.keys()
    }

    /// Totals in year order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.values().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&YearKey, f64)> {
        self.entries.iter().map(|(year, value)| (year, *value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over all years
    pub fn grand_total(&self) -> f64 {
        self.entries.values().sum()
    }

    /// Totals divided by `divisor`, for display scaling
    pub fn normalized(&self, divisor: f64) -> Vec<(YearKey, f64)> {
        self.entries
            .iter()
            .map(|(year, value)| (year.clone(), value / divisor))
            .collect()
    }
}

/// One line of the exported table
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRow {
    pub year: YearKey,
    pub crime_total: f64,
    pub visitor_total: f64,
}

/// What happened to the export artifact
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Written { path: PathBuf, rows: usize },
    Skipped { reason: String },
}

impl ExportOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, ExportOutcome::Written { .. })
    }
}

/// Report of a complete pipeline run
#[derive(Debug)]
pub struct RunSummary {
    pub museum_stats: ParseStats,
    pub crime_stats: ParseStats,
    pub visitors: YearlyTotals,
    pub crimes: YearlyTotals,
    pub export: ExportOutcome,
    pub charts: Vec<PathBuf>,
    pub processing_time_ms: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn year(s: &str) -> YearKey {
        YearKey::parse(s).unwrap()
    }

    #[test]
    fn test_year_key_accepts_four_digits_only() {
        assert_eq!(year("2015").as_str(), "2015");
        assert_eq!(year(" 2016 ").as_str(), "2016");
        assert!(YearKey::parse("15").is_none());
        assert!(YearKey::parse("20155").is_none());
        assert!(YearKey::parse("20a5").is_none());
        assert!(YearKey::parse("").is_none());
    }

    #[test]
    fn test_year_key_rejects_non_ascii_digits() {
        // Fullwidth and Arabic-Indic digits
        assert!(YearKey::parse("\u{FF12}\u{FF10}\u{FF11}\u{FF15}").is_none());
        assert!(YearKey::parse("\u{0662}\u{0660}\u{0661}\u{0665}").is_none());
    }

    #[test]
    fn test_year_key_numeric_value_and_order() {
        assert_eq!(year("2014").year(), 2014);
        assert_eq!(year("0999").year(), 999);
        assert!(year("2014") < year("2015"));
    }

    #[test]
    fn test_dataset_reductions() {
        assert_eq!(DatasetKind::Museum.reduction(), Reduction::Sum);
        assert_eq!(DatasetKind::Crime.reduction(), Reduction::Count);
    }

    #[test]
    fn test_yearly_totals_iterate_ascending() {
        let mut entries = BTreeMap::new();
        entries.insert(year("2016"), 3000.0);
        entries.insert(year("2014"), 1000.0);
        let totals = YearlyTotals::new(DatasetKind::Museum, entries);

        let years: Vec<&str> = totals.years().map(YearKey::as_str).collect();
        assert_eq!(years, vec!["2014", "2016"]);
        assert_eq!(totals.grand_total(), 4000.0);
        assert_eq!(
            totals.normalized(1000.0),
            vec![(year("2014"), 1.0), (year("2016"), 3.0)]
        );
    }
}
