//! Parsing statistics and result structures
//!
//! Tracks how many lines of an input file were accepted, filtered or
//! skipped, and keeps a bounded sample of the skip reasons.

use crate::models::{DatasetKind, ParsedRecord};

/// Parsing result with accepted records and statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Rows that contribute to the yearly totals
    pub records: Vec<ParsedRecord>,

    pub stats: ParseStats,
}

/// Line accounting for one input file
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParseStats {
    pub dataset: DatasetKind,

    /// Every line in the file, header included
    pub total_lines: usize,

    /// Lines equal to the header line
    pub header_lines: usize,

    /// Rows accepted
    pub records_parsed: usize,

    /// Rows dropped by the year window
    pub out_of_range: usize,

    /// Malformed rows skipped
    pub records_skipped: usize,

    /// First few skip reasons, for diagnostics
    pub errors: Vec<String>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new(dataset: DatasetKind) -> Self {
        Self {
            dataset,
            total_lines: 0,
            header_lines: 0,
            records_parsed: 0,
            out_of_range: 0,
            records_skipped: 0,
            errors: Vec::new(),
        }
    }

    /// Lines that were candidate data rows
    pub fn data_lines(&self) -> usize {
        self.total_lines - self.header_lines
    }

    /// Count a skipped row, keeping its message while under `max_retained`
    pub fn record_skip(&mut self, message: String, max_retained: usize) {
        self.records_skipped += 1;
        if self.errors.len() < max_retained {
            self.errors.push(message);
        }
    }

    /// Share of data lines that were well formed, as a percentage
    pub fn success_rate(&self) -> f64 {
        let data_lines = self.data_lines();
        if data_lines == 0 {
            100.0
        } else {
            ((data_lines - self.records_skipped) as f64 / data_lines as f64) * 100.0
        }
    }
}
