//! Static chart rendering with plotters
//!
//! Two PNG views of the normalized totals:
//! 1. Bar chart: years as categories, one bar per dataset side by side
//! 2. Line chart: years on a numeric axis, one line per dataset

use crate::constants::{
    CHART_HEIGHT, CHART_TITLE, CHART_WIDTH, CHART_X_AXIS, CHART_Y_AXIS, CRIME_SERIES_LABEL,
    CRIME_SERIES_RGB, MUSEUM_SERIES_LABEL, MUSEUM_SERIES_RGB,
};
use crate::models::{YearKey, YearlyTotals};
use plotters::prelude::*;
use std::collections::BTreeSet;
use std::error::Error;
use std::path::Path;

pub type DrawResult = std::result::Result<(), Box<dyn Error>>;

/// Signature shared by the chart renderers
pub type DrawFn = fn(&ChartData, &Path) -> DrawResult;

const MUSEUM_COLOR: RGBColor = RGBColor(
    MUSEUM_SERIES_RGB.0,
    MUSEUM_SERIES_RGB.1,
    MUSEUM_SERIES_RGB.2,
);
const CRIME_COLOR: RGBColor = RGBColor(CRIME_SERIES_RGB.0, CRIME_SERIES_RGB.1, CRIME_SERIES_RGB.2);

/// Half-width of one bar, in category units
const BAR_WIDTH: f64 = 0.35;

/// Normalized series ready for plotting
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Union of both datasets' years, ascending
    pub years: Vec<YearKey>,
    pub museum: Vec<(YearKey, f64)>,
    pub crimes: Vec<(YearKey, f64)>,
}

impl ChartData {
    /// Scale both datasets by `divisor` for display
    pub fn normalized(visitors: &YearlyTotals, crimes: &YearlyTotals, divisor: f64) -> Self {
        let years: BTreeSet<YearKey> = visitors.years().chain(crimes.years()).cloned().collect();
        Self {
            years: years.into_iter().collect(),
            museum: visitors.normalized(divisor),
            crimes: crimes.normalized(divisor),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Top of the value axis with some headroom
    pub fn y_max(&self) -> f64 {
        let max = self
            .museum
            .iter()
            .chain(self.crimes.iter())
            .map(|(_, value)| *value)
            .fold(0.0, f64::max);
        if max > 0.0 { max * 1.1 } else { 1.0 }
    }

    /// Category slot of a year on the bar chart
    fn slot(&self, year: &YearKey) -> Option<usize> {
        self.years.binary_search(year).ok()
    }

    /// Numeric x range for the line chart
    fn year_range(&self) -> (f64, f64) {
        let first = self.years.first().map_or(0.0, |y| f64::from(y.year()));
        let last = self.years.last().map_or(0.0, |y| f64::from(y.year()));
        if first == last {
            (first - 1.0, last + 1.0)
        } else {
            (first, last)
        }
    }
}

/// Grouped bar chart, one category per year
pub fn render_bar_chart(data: &ChartData, path: &Path) -> DrawResult {
    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let categories = data.years.len();
    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(categories as f64 - 0.5), 0f64..data.y_max())?;

    let labels = data.years.clone();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(CHART_X_AXIS)
        .y_desc(CHART_Y_AXIS)
        .x_labels(categories)
        .x_label_formatter(&|x| {
            let index = x.round();
            if (x - index).abs() < 1e-6 && index >= 0.0 {
                labels
                    .get(index as usize)
                    .map(ToString::to_string)
                    .unwrap_or_default()
            } else {
                String::new()
            }
        })
        .draw()?;

    let series = [
        (&data.museum, MUSEUM_COLOR, MUSEUM_SERIES_LABEL, -BAR_WIDTH),
        (&data.crimes, CRIME_COLOR, CRIME_SERIES_LABEL, 0.0),
    ];

    for (values, color, label, offset) in series {
        chart
            .draw_series(values.iter().filter_map(|(year, value)| {
                let slot = data.slot(year)? as f64;
                Some(Rectangle::new(
                    [(slot + offset, 0.0), (slot + offset + BAR_WIDTH, *value)],
                    color.filled(),
                ))
            }))?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Line chart over numeric years
pub fn render_line_chart(data: &ChartData, path: &Path) -> DrawResult {
    let root = BitMapBackend::new(path, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let (first_year, last_year) = data.year_range();
    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(first_year..last_year, 0f64..data.y_max())?;

    chart
        .configure_mesh()
        .x_desc(CHART_X_AXIS)
        .y_desc(CHART_Y_AXIS)
        .x_label_formatter(&|x| format!("{:.0}", x))
        .draw()?;

    let series = [
        (&data.museum, MUSEUM_COLOR, MUSEUM_SERIES_LABEL),
        (&data.crimes, CRIME_COLOR, CRIME_SERIES_LABEL),
    ];

    for (values, color, label) in series {
        let points: Vec<(f64, f64)> = values
            .iter()
            .map(|(year, value)| (f64::from(year.year()), *value))
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        chart.draw_series(
            points
                .into_iter()
                .map(|point| Circle::new(point, 3, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
