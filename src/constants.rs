//! Application constants for the LA correlator
//!
//! Default paths, record layouts, chart labels and limits used
//! throughout the pipeline.

// =============================================================================
// Input and Output Paths
// =============================================================================

/// Museum visitors input file, relative to the working directory
pub const DEFAULT_MUSEUM_INPUT: &str = "laexperiment_data/input/LA_museum_visitors.csv";

/// Crime incidents input file, relative to the working directory
pub const DEFAULT_CRIME_INPUT: &str =
    "laexperiment_data/input/LA_Crime_Data_from_2010_to_Present.csv";

/// Joined table output file
pub const DEFAULT_EXPORT_PATH: &str = "laexperiment_data/output/LA_MuseumVisitorsAndCrimes.csv";

/// File name of the categorical chart
pub const BAR_CHART_FILE: &str = "LA_MuseumVisitorsAndCrimes_bar.png";

/// File name of the continuous chart
pub const LINE_CHART_FILE: &str = "LA_MuseumVisitorsAndCrimes_line.png";

// =============================================================================
// Record Layouts
// =============================================================================

/// Field delimiter shared by both input files
pub const FIELD_DELIMITER: char = ',';

/// Museum rows: `YYYY-MM,<count>,<count>,...`
pub mod museum {
    pub const DATE_FIELD: usize = 0;
    pub const DATE_DELIMITER: char = '-';
    pub const YEAR_SEGMENT: usize = 0;
    pub const FIRST_VALUE_FIELD: usize = 1;
}

/// Crime rows: the third field holds `MM/DD/YYYY`
pub mod crime {
    pub const DATE_FIELD: usize = 2;
    pub const DATE_DELIMITER: char = '/';
    pub const YEAR_SEGMENT: usize = 2;

    /// Earliest accepted incident year
    pub const MIN_YEAR: i32 = 2014;

    /// Latest accepted incident year (inclusive)
    pub const MAX_YEAR: i32 = 2018;
}

// =============================================================================
// Export Schema
// =============================================================================

pub const EXPORT_YEAR_COLUMN: &str = "Year";
pub const EXPORT_CRIMES_COLUMN: &str = "LACrimesCount";
pub const EXPORT_VISITORS_COLUMN: &str = "LAMuseumVisitorsCount";

// =============================================================================
// Presentation
// =============================================================================

/// Totals are divided by this for chart display only
pub const DEFAULT_NORMALIZATION_DIVISOR: f64 = 1000.0;

pub const CHART_WIDTH: u32 = 800;
pub const CHART_HEIGHT: u32 = 600;
pub const CHART_TITLE: &str = "Correlation between LA Crimes and Museum Visitors";
pub const CHART_X_AXIS: &str = "Year of reading";
pub const CHART_Y_AXIS: &str = "Crimes & Museum Visitors Count";
pub const MUSEUM_SERIES_LABEL: &str = "Museum Visitors in LA (# in Thousands)";
pub const CRIME_SERIES_LABEL: &str = "Crimes in LA (# in Thousands)";

/// Series fill colors (RGB)
pub const MUSEUM_SERIES_RGB: (u8, u8, u8) = (244, 89, 66);
pub const CRIME_SERIES_RGB: (u8, u8, u8) = (235, 244, 66);

// =============================================================================
// Limits
// =============================================================================

/// Malformed-line messages retained per dataset
pub const DEFAULT_MAX_RETAINED_ERRORS: usize = 20;

/// Target crate for the default log filter
pub const LOG_TARGET: &str = "la_correlator";
