//! Console dump of the yearly totals.

use crate::models::YearlyTotals;
use colored::*;

/// `year: value` lines for one dataset, ascending by year
pub fn format_totals(totals: &YearlyTotals) -> String {
    totals
        .iter()
        .map(|(year, value)| format!("{}: {:?}", year, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print both datasets, museum visitors first
pub fn print_totals(visitors: &YearlyTotals, crimes: &YearlyTotals) {
    for totals in [visitors, crimes] {
        println!("{}", totals.dataset().label().bright_cyan().bold());
        if totals.is_empty() {
            println!("  {}", "(no data)".bright_black());
        } else {
            println!("{}", format_totals(totals));
        }
    }
}
