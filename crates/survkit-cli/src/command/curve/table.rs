//! Plain-text curve tables
//!
//! Renders a step function and its risk-set columns in a fixed-width layout.

use std::io::{self, Write};

use crate::schema::report::CurveReport;

// time(12) + at_risk(10) + events(8) + value(12) + spaces(3)
const TABLE_WIDTH: usize = 45;

fn write_curve_table_header(w: &mut dyn Write, value_col: &str) -> io::Result<()> {
    writeln!(
        w,
        "  {:>12} {:>10} {:>8} {:>12}",
        "Time", "At risk", "Events", value_col
    )
}

fn write_curve_table_separator(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "  {}", "-".repeat(TABLE_WIDTH))
}

/// Write a formatted curve table
///
/// # Arguments
/// * `report` - The curve to print
/// * `value_col` - Heading of the value column (e.g. "S(t)", "H(t)")
pub(super) fn write_curve_table(
    w: &mut dyn Write,
    report: &CurveReport,
    value_col: &str,
) -> io::Result<()> {
    writeln!(w, "Estimator: {}", report.estimator)?;
    write_curve_table_header(w, value_col)?;
    write_curve_table_separator(w)?;

    let rows = report
        .times
        .iter()
        .zip(&report.at_risk)
        .zip(&report.events)
        .zip(&report.values);
    for (((time, at_risk), events), value) in rows {
        writeln!(w, "  {time:>12.4} {at_risk:>10} {events:>8} {value:>12.6}")?;
    }

    if report.estimator == "kaplan-meier" {
        let median = report
            .median_survival
            .map_or("N/A".to_string(), |m| format!("{m:.4}"));
        writeln!(w)?;
        writeln!(w, "Median survival: {median}")?;
    }
    Ok(())
}
