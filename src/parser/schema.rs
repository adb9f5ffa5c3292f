//! Record layouts for the two input files.

use crate::constants::{FIELD_DELIMITER, crime, museum};
use crate::error::{CorrelationError, Result};
use crate::models::DatasetKind;
use serde::{Deserialize, Serialize};

/// Where a row's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ValueLayout {
    /// Sum every non-empty numeric field from this index onwards
    SumFrom(usize),
    /// Every accepted row contributes a fixed weight
    Weight(f64),
}

/// Describes how to pull a year key and a value out of one delimited line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub dataset: DatasetKind,
    pub delimiter: char,
    /// Index of the field holding the date
    pub date_field: usize,
    /// Separator between the date's components
    pub date_delimiter: char,
    /// Which date component is the year
    pub year_segment: usize,
    pub values: ValueLayout,
    /// Rows with an earlier year are filtered out
    pub min_year: Option<i32>,
    /// Rows with a later year are filtered out (inclusive bound)
    pub max_year: Option<i32>,
}

impl RecordSchema {
    /// `YYYY-MM,<count>,<count>,...`
    pub fn museum() -> Self {
        Self {
            dataset: DatasetKind::Museum,
            delimiter: FIELD_DELIMITER,
            date_field: museum::DATE_FIELD,
            date_delimiter: museum::DATE_DELIMITER,
            year_segment: museum::YEAR_SEGMENT,
            values: ValueLayout::SumFrom(museum::FIRST_VALUE_FIELD),
            min_year: None,
            max_year: None,
        }
    }

    /// Third field is `MM/DD/YYYY`; each row counts once
    pub fn crime() -> Self {
        Self {
            dataset: DatasetKind::Crime,
            delimiter: FIELD_DELIMITER,
            date_field: crime::DATE_FIELD,
            date_delimiter: crime::DATE_DELIMITER,
            year_segment: crime::YEAR_SEGMENT,
            values: ValueLayout::Weight(1.0),
            min_year: Some(crime::MIN_YEAR),
            max_year: Some(crime::MAX_YEAR),
        }
    }

    /// Default schema for a dataset
    pub fn for_dataset(dataset: DatasetKind) -> Self {
        match dataset {
            DatasetKind::Museum => Self::museum(),
            DatasetKind::Crime => Self::crime(),
        }
    }

    /// Replace the accepted year window
    pub fn with_year_window(mut self, min_year: Option<i32>, max_year: Option<i32>) -> Self {
        self.min_year = min_year;
        self.max_year = max_year;
        self
    }

    /// Whether a parsed year falls inside the window
    pub fn accepts_year(&self, year: i32) -> bool {
        self.min_year.is_none_or(|min| year >= min) && self.max_year.is_none_or(|max| year <= max)
    }

    /// Fewest fields a line needs before its date can be read
    pub fn min_fields(&self) -> usize {
        self.date_field + 1
    }

    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_year, self.max_year) {
            if min > max {
                return Err(CorrelationError::configuration(format!(
                    "{} year window is empty: {} > {}",
                    self.dataset, min, max
                )));
            }
        }

        if self.delimiter == self.date_delimiter {
            return Err(CorrelationError::configuration(format!(
                "{} field and date delimiters must differ (both '{}')",
                self.dataset, self.delimiter
            )));
        }

        match self.values {
            ValueLayout::SumFrom(start) if start <= self.date_field => {
                Err(CorrelationError::configuration(format!(
                    "{} value fields must follow the date field",
                    self.dataset
                )))
            }
            ValueLayout::Weight(weight) if !weight.is_finite() || weight < 0.0 => {
                Err(CorrelationError::configuration(format!(
                    "{} row weight must be a non-negative number",
                    self.dataset
                )))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crime_window_is_inclusive() {
        let schema = RecordSchema::crime();
        assert!(!schema.accepts_year(2013));
        assert!(schema.accepts_year(2014));
        assert!(schema.accepts_year(2018));
        assert!(!schema.accepts_year(2019));
    }

    #[test]
    fn test_museum_accepts_any_year() {
        let schema = RecordSchema::museum();
        assert!(schema.accepts_year(1900));
        assert!(schema.accepts_year(2100));
    }

    #[test]
    fn test_validate_rejects_empty_window() {
        let schema = RecordSchema::crime().with_year_window(Some(2019), Some(2014));
        assert!(matches!(
            schema.validate(),
            Err(CorrelationError::Configuration { .. })
        ));
        assert!(RecordSchema::crime().validate().is_ok());
        assert!(RecordSchema::museum().validate().is_ok());
    }
}
